//! Operand decoding: from a VM capture set over the buffered events to
//! the parameter record handed to action builders.
//!
//! User-level validation happens here (the count bound); structural
//! problems — a missing command selector, a command whose grammar binds
//! an operand the captures lack — are verifier-grade programming errors
//! and panic.

use quill_events::{Event, KeyKind};
use quill_program::{CaptureId, CaptureSet};

/// Operands extracted for one accepted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandParams {
    pub count: Option<u32>,
    pub clipboard_page: Option<char>,
    pub rune: Option<char>,
}

impl CommandParams {
    pub fn count_or(&self, default: u32) -> u32 {
        self.count.unwrap_or(default)
    }

    /// The literal rune operand; the selected command's grammar binds one,
    /// so its absence is a table/verifier bug.
    pub fn required_rune(&self) -> char {
        self.rune
            .expect("command grammar binds a rune operand but none was captured")
    }
}

/// Decode outcome: either a command to build, or a user input error that
/// cancels the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedCommand {
    Run { index: u16, params: CommandParams },
    CountTooLarge,
}

/// Extract operands from `captures` against the event prefix it spans.
pub fn decode_captures(
    captures: &CaptureSet,
    events: &[Event],
    count_limit: u32,
) -> DecodedCommand {
    let index = captures
        .command_index()
        .expect("accepted capture set has no command selector");

    let mut params = CommandParams::default();
    if let Some(span) = captures.span(CaptureId::Count) {
        let mut value: u64 = 0;
        for ev in &events[span.start..span.end] {
            debug_assert!(ev.is_rune() && ev.rune.is_ascii_digit());
            value = value * 10 + u64::from(ev.rune as u8 - b'0');
            if value > u64::from(count_limit) {
                tracing::warn!(target: "input.decode", command = index, "count exceeds limit");
                return DecodedCommand::CountTooLarge;
            }
        }
        params.count = Some(value as u32);
    }
    if let Some(span) = captures.span(CaptureId::ClipboardPage) {
        params.clipboard_page = Some(events[span.start].rune);
    }
    if let Some(span) = captures.span(CaptureId::OperandRune) {
        params.rune = Some(operand_rune(&events[span.start]));
    }

    tracing::debug!(
        target: "input.decode",
        command = index,
        count = ?params.count,
        page = ?params.clipboard_page,
        rune = ?params.rune,
        "decoded command"
    );
    DecodedCommand::Run { index, params }
}

/// Fold a captured operand event to its rune: Enter and Tab stand for the
/// runes they insert (`r<Enter>` splits the line, `r<Tab>` writes a tab).
fn operand_rune(ev: &Event) -> char {
    match ev.key {
        KeyKind::Rune => ev.rune,
        KeyKind::Enter => '\n',
        KeyKind::Tab => '\t',
        other => panic!("operand capture over non-operand key {other:?}"),
    }
}
