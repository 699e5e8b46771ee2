//! Record/replay semantics: round-trips, non-recursion, and the
//! repeat-last slot.

mod common;
use common::Harness;
use quill_text::Position;

#[test]
fn macro_round_trip_matches_issuing_twice() {
    let mut recorded = Harness::new("abcdef");
    recorded.feed(":start<cr>x:stop<cr>:rep<cr>");
    let mut direct = Harness::new("abcdef");
    direct.feed("xx");
    assert_eq!(recorded.text(), direct.text());
    assert_eq!(recorded.cursor(), direct.cursor());
}

#[test]
fn replay_does_not_append_to_the_recording() {
    let mut h = Harness::new("abcdefgh");
    h.feed(":start<cr>x:stop<cr>");
    assert_eq!(h.interp.macros().user_macro().len(), 1);
    h.feed(":rep<cr>:rep<cr>");
    // Two replays, one deletion each; the buffer still holds one action.
    assert_eq!(h.interp.macros().user_macro().len(), 1);
    assert_eq!(h.text(), "defgh");
}

#[test]
fn menu_keystrokes_are_not_recorded() {
    let mut h = Harness::new("abcdef");
    h.feed(":start<cr>x:stop<cr>");
    // The recording must hold exactly the delete: no menu open/close,
    // no query edits.
    let recorded = h.interp.macros().user_macro();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].is_recordable());
}

#[test]
fn restart_discards_previous_recording() {
    let mut h = Harness::new("abcdef");
    h.feed(":start<cr>xx:stop<cr>");
    assert_eq!(h.interp.macros().user_macro().len(), 2);
    h.feed(":start<cr>x:stop<cr>");
    assert_eq!(h.interp.macros().user_macro().len(), 1);
}

#[test]
fn motion_repeat_is_idempotent_on_text() {
    let mut repeated = Harness::new("foo bar baz");
    repeated.feed("w.");
    let mut direct = Harness::new("foo bar baz");
    direct.feed("ww");
    assert_eq!(repeated.text(), "foo bar baz");
    assert_eq!(repeated.cursor(), direct.cursor());
}

#[test]
fn repeat_replays_edits_at_the_current_cursor() {
    let mut h = Harness::new("aa bb cc");
    h.feed("dw");
    assert_eq!(h.text(), "bb cc");
    h.feed("w.");
    assert_eq!(h.text(), "bb ");
    assert_eq!(h.cursor(), Position::new(0, 3));
}

#[test]
fn insert_run_recorded_and_replayed() {
    let mut h = Harness::new("xy");
    h.feed(":start<cr>iab<esc>:stop<cr>");
    assert_eq!(h.text(), "abxy");
    h.feed(":rep<cr>");
    // Replay re-enters insert at the cursor and types the same runes.
    assert_eq!(h.text(), "aabbxy");
}
