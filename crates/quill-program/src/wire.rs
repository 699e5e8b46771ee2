//! Binary program codec.
//!
//! Layout: 4-byte magic `QVPM`, version byte, instruction count as
//! little-endian u32, then one record per instruction (`opcode: u8` +
//! opcode-specific payload). Runes travel as little-endian u32 scalar
//! values, branch targets as little-endian u32 pcs.
//!
//! Loading a malformed file is a startup-time fatal condition for the
//! editor; this module only reports the structured [`ProgramError`] and
//! leaves policy to the caller.

use crate::inst::{CaptureId, EventPattern, Inst, Program};
use quill_events::KeyKind;
use std::path::Path;
use thiserror::Error;

pub const MAGIC: [u8; 4] = *b"QVPM";
pub const VERSION: u8 = 1;

const OP_MATCH: u8 = 0x01;
const OP_JUMP: u8 = 0x02;
const OP_SPLIT: u8 = 0x03;
const OP_START_CAPTURE: u8 = 0x04;
const OP_END_CAPTURE: u8 = 0x05;
const OP_ACCEPT: u8 = 0x06;

const PAT_KEY: u8 = 0x01;
const PAT_RUNE: u8 = 0x02;
const PAT_RUNE_RANGE: u8 = 0x03;
const PAT_ANY_RUNE: u8 = 0x04;
const PAT_ANY_EVENT: u8 = 0x05;

const CAP_COMMAND: u8 = 0x01;
const CAP_COUNT: u8 = 0x02;
const CAP_CLIPBOARD_PAGE: u8 = 0x03;
const CAP_OPERAND_RUNE: u8 = 0x04;

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("bad magic (not a program file)")]
    BadMagic,
    #[error("unsupported program version {0}")]
    UnsupportedVersion(u8),
    #[error("truncated program file")]
    Truncated,
    #[error("unknown opcode {0:#04x}")]
    BadOpcode(u8),
    #[error("unknown pattern tag {0:#04x}")]
    BadPattern(u8),
    #[error("unknown key kind code {0:#04x}")]
    BadKeyKind(u8),
    #[error("unknown capture tag {0:#04x}")]
    BadCaptureTag(u8),
    #[error("invalid rune scalar {0:#010x}")]
    BadRune(u32),
    #[error("trailing bytes after last instruction")]
    TrailingBytes,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// -------------------------------------------------------------------------------------------------
// Key kind codes (stable wire values; append-only)
// -------------------------------------------------------------------------------------------------
fn key_kind_code(kind: KeyKind) -> u8 {
    match kind {
        KeyKind::Rune => 0x00,
        KeyKind::Up => 0x01,
        KeyKind::Down => 0x02,
        KeyKind::Left => 0x03,
        KeyKind::Right => 0x04,
        KeyKind::Home => 0x05,
        KeyKind::End => 0x06,
        KeyKind::PageUp => 0x07,
        KeyKind::PageDown => 0x08,
        KeyKind::Esc => 0x09,
        KeyKind::Enter => 0x0a,
        KeyKind::Tab => 0x0b,
        KeyKind::Backspace => 0x0c,
        KeyKind::Delete => 0x0d,
        KeyKind::CtrlB => 0x0e,
        KeyKind::CtrlD => 0x0f,
        KeyKind::CtrlF => 0x10,
        KeyKind::CtrlR => 0x11,
        KeyKind::CtrlU => 0x12,
        KeyKind::Unmapped => 0x13,
    }
}

fn key_kind_from_code(code: u8) -> Result<KeyKind, ProgramError> {
    Ok(match code {
        0x00 => KeyKind::Rune,
        0x01 => KeyKind::Up,
        0x02 => KeyKind::Down,
        0x03 => KeyKind::Left,
        0x04 => KeyKind::Right,
        0x05 => KeyKind::Home,
        0x06 => KeyKind::End,
        0x07 => KeyKind::PageUp,
        0x08 => KeyKind::PageDown,
        0x09 => KeyKind::Esc,
        0x0a => KeyKind::Enter,
        0x0b => KeyKind::Tab,
        0x0c => KeyKind::Backspace,
        0x0d => KeyKind::Delete,
        0x0e => KeyKind::CtrlB,
        0x0f => KeyKind::CtrlD,
        0x10 => KeyKind::CtrlF,
        0x11 => KeyKind::CtrlR,
        0x12 => KeyKind::CtrlU,
        0x13 => KeyKind::Unmapped,
        other => return Err(ProgramError::BadKeyKind(other)),
    })
}

// -------------------------------------------------------------------------------------------------
// Encode
// -------------------------------------------------------------------------------------------------
pub fn to_bytes(program: &Program) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + program.len() * 6);
    out.extend_from_slice(&MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&(program.len() as u32).to_le_bytes());
    for inst in program.insts() {
        encode_inst(*inst, &mut out);
    }
    out
}

fn encode_inst(inst: Inst, out: &mut Vec<u8>) {
    match inst {
        Inst::Match(pattern) => {
            out.push(OP_MATCH);
            encode_pattern(pattern, out);
        }
        Inst::Jump(t) => {
            out.push(OP_JUMP);
            out.extend_from_slice(&t.to_le_bytes());
        }
        Inst::Split(a, b) => {
            out.push(OP_SPLIT);
            out.extend_from_slice(&a.to_le_bytes());
            out.extend_from_slice(&b.to_le_bytes());
        }
        Inst::StartCapture(id) => {
            out.push(OP_START_CAPTURE);
            encode_capture_id(id, out);
        }
        Inst::EndCapture(id) => {
            out.push(OP_END_CAPTURE);
            encode_capture_id(id, out);
        }
        Inst::Accept => out.push(OP_ACCEPT),
    }
}

fn encode_pattern(pattern: EventPattern, out: &mut Vec<u8>) {
    match pattern {
        EventPattern::Key(kind) => {
            out.push(PAT_KEY);
            out.push(key_kind_code(kind));
        }
        EventPattern::Rune(r) => {
            out.push(PAT_RUNE);
            out.extend_from_slice(&(r as u32).to_le_bytes());
        }
        EventPattern::RuneRange(lo, hi) => {
            out.push(PAT_RUNE_RANGE);
            out.extend_from_slice(&(lo as u32).to_le_bytes());
            out.extend_from_slice(&(hi as u32).to_le_bytes());
        }
        EventPattern::AnyRune => out.push(PAT_ANY_RUNE),
        EventPattern::AnyEvent => out.push(PAT_ANY_EVENT),
    }
}

fn encode_capture_id(id: CaptureId, out: &mut Vec<u8>) {
    match id {
        CaptureId::Command(i) => {
            out.push(CAP_COMMAND);
            out.extend_from_slice(&i.to_le_bytes());
        }
        CaptureId::Count => out.push(CAP_COUNT),
        CaptureId::ClipboardPage => out.push(CAP_CLIPBOARD_PAGE),
        CaptureId::OperandRune => out.push(CAP_OPERAND_RUNE),
    }
}

// -------------------------------------------------------------------------------------------------
// Decode
// -------------------------------------------------------------------------------------------------
struct Reader<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl<'a> Reader<'a> {
    fn u8(&mut self) -> Result<u8, ProgramError> {
        let b = *self.bytes.get(self.at).ok_or(ProgramError::Truncated)?;
        self.at += 1;
        Ok(b)
    }

    fn u16(&mut self) -> Result<u16, ProgramError> {
        let lo = self.u8()?;
        let hi = self.u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    fn u32(&mut self) -> Result<u32, ProgramError> {
        let mut buf = [0u8; 4];
        for slot in &mut buf {
            *slot = self.u8()?;
        }
        Ok(u32::from_le_bytes(buf))
    }

    fn rune(&mut self) -> Result<char, ProgramError> {
        let scalar = self.u32()?;
        char::from_u32(scalar).ok_or(ProgramError::BadRune(scalar))
    }
}

pub fn from_bytes(bytes: &[u8]) -> Result<Program, ProgramError> {
    let mut r = Reader { bytes, at: 0 };
    let mut magic = [0u8; 4];
    for slot in &mut magic {
        *slot = r.u8()?;
    }
    if magic != MAGIC {
        return Err(ProgramError::BadMagic);
    }
    let version = r.u8()?;
    if version != VERSION {
        return Err(ProgramError::UnsupportedVersion(version));
    }
    let count = r.u32()? as usize;
    let mut insts = Vec::with_capacity(count);
    for _ in 0..count {
        insts.push(decode_inst(&mut r)?);
    }
    if r.at != bytes.len() {
        return Err(ProgramError::TrailingBytes);
    }
    Ok(Program::from_insts(insts))
}

fn decode_inst(r: &mut Reader<'_>) -> Result<Inst, ProgramError> {
    Ok(match r.u8()? {
        OP_MATCH => Inst::Match(decode_pattern(r)?),
        OP_JUMP => Inst::Jump(r.u32()?),
        OP_SPLIT => Inst::Split(r.u32()?, r.u32()?),
        OP_START_CAPTURE => Inst::StartCapture(decode_capture_id(r)?),
        OP_END_CAPTURE => Inst::EndCapture(decode_capture_id(r)?),
        OP_ACCEPT => Inst::Accept,
        other => return Err(ProgramError::BadOpcode(other)),
    })
}

fn decode_pattern(r: &mut Reader<'_>) -> Result<EventPattern, ProgramError> {
    Ok(match r.u8()? {
        PAT_KEY => EventPattern::Key(key_kind_from_code(r.u8()?)?),
        PAT_RUNE => EventPattern::Rune(r.rune()?),
        PAT_RUNE_RANGE => EventPattern::RuneRange(r.rune()?, r.rune()?),
        PAT_ANY_RUNE => EventPattern::AnyRune,
        PAT_ANY_EVENT => EventPattern::AnyEvent,
        other => return Err(ProgramError::BadPattern(other)),
    })
}

fn decode_capture_id(r: &mut Reader<'_>) -> Result<CaptureId, ProgramError> {
    Ok(match r.u8()? {
        CAP_COMMAND => CaptureId::Command(r.u16()?),
        CAP_COUNT => CaptureId::Count,
        CAP_CLIPBOARD_PAGE => CaptureId::ClipboardPage,
        CAP_OPERAND_RUNE => CaptureId::OperandRune,
        other => return Err(ProgramError::BadCaptureTag(other)),
    })
}

// -------------------------------------------------------------------------------------------------
// File helpers
// -------------------------------------------------------------------------------------------------
pub fn save(program: &Program, path: &Path) -> Result<(), ProgramError> {
    std::fs::write(path, to_bytes(program))?;
    tracing::debug!(target: "input.wire", path = %path.display(), insts = program.len(), "program saved");
    Ok(())
}

pub fn load(path: &Path) -> Result<Program, ProgramError> {
    let bytes = std::fs::read(path)?;
    let program = from_bytes(&bytes)?;
    tracing::debug!(target: "input.wire", path = %path.display(), insts = program.len(), "program loaded");
    Ok(program)
}
