//! Record/replay buffers: the repeat-last slot and the named user macro.
//!
//! The recorder is owned by the interpreter instance (not process-global)
//! and stores whole [`Action`] values. Replay applies stored actions
//! directly; it never runs through `process_event`, so replayed actions
//! cannot re-enter the record buffers.

use crate::Action;

#[derive(Debug, Default)]
pub struct MacroRecorder {
    /// Most recent repeatable action (`.` target).
    last_action: Option<Action>,
    recording: bool,
    user_macro: Vec<Action>,
}

impl MacroRecorder {
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Begin a fresh named macro, discarding any previous recording.
    pub fn start(&mut self) {
        self.recording = true;
        self.user_macro.clear();
        tracing::debug!(target: "input.macro", "recording started");
    }

    pub fn stop(&mut self) {
        self.recording = false;
        tracing::debug!(target: "input.macro", actions = self.user_macro.len(), "recording stopped");
    }

    /// Append an accepted action while recording is on.
    pub fn record(&mut self, action: Action) {
        if self.recording {
            self.user_macro.push(action);
        }
    }

    pub fn set_last_action(&mut self, action: Action) {
        self.last_action = Some(action);
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.last_action.as_ref()
    }

    pub fn user_macro(&self) -> &[Action] {
        &self.user_macro
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, Motion};

    fn mv() -> Action {
        Action::single(Command::Move {
            motion: Motion::Left,
            count: 1,
        })
    }

    #[test]
    fn records_only_while_on() {
        let mut rec = MacroRecorder::default();
        rec.record(mv());
        assert!(rec.user_macro().is_empty());
        rec.start();
        rec.record(mv());
        rec.stop();
        rec.record(mv());
        assert_eq!(rec.user_macro().len(), 1);
    }

    #[test]
    fn start_discards_previous_recording() {
        let mut rec = MacroRecorder::default();
        rec.start();
        rec.record(mv());
        rec.stop();
        rec.start();
        assert!(rec.user_macro().is_empty());
    }

    #[test]
    fn last_action_replaces() {
        let mut rec = MacroRecorder::default();
        assert!(rec.last_action().is_none());
        rec.set_last_action(mv());
        rec.set_last_action(Action::single(Command::Undo));
        assert_eq!(rec.last_action(), Some(&Action::single(Command::Undo)));
    }
}
