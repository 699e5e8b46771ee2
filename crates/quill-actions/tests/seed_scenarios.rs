//! End-to-end flows through the interpreter: key notation in, final text
//! and cursor out.

mod common;
use common::Harness;
use pretty_assertions::assert_eq;
use quill_text::Position;

#[test]
fn word_motion_then_insert_run() {
    let mut h = Harness::new("Lorem ipsum dolor\nsit amet");
    h.feed("witest <esc>");
    assert_eq!(h.text(), "Lorem test ipsum dolor\nsit amet");
    assert_eq!(h.cursor(), Position::new(0, 10));
}

#[test]
fn delete_line_reanchors_to_remaining_text() {
    let mut h = Harness::new("Lorem ipsum dolor\nsit amet consectetur");
    h.feed("jdd");
    assert_eq!(h.text(), "Lorem ipsum dolor");
    assert_eq!(h.cursor(), Position::new(0, 0));
}

#[test]
fn insert_backspaces_then_escape() {
    let mut h = Harness::new("");
    h.feed("ifoobar<bs><bs><bs><esc>");
    assert_eq!(h.text(), "foo");
    assert_eq!(h.cursor(), Position::new(0, 2));
}

#[test]
fn delete_a_word_at_line_end_takes_word_only() {
    let mut h = Harness::new("ab   cd   ef");
    h.feed("$daw");
    assert_eq!(h.text(), "ab   cd   ");
    assert_eq!(h.cursor(), Position::new(0, 10));
}

#[test]
fn replace_with_newline_splits_at_cursor() {
    let mut h = Harness::new("Lorem ipsum dolor");
    h.feed("llllr<cr>");
    assert_eq!(h.text(), "Lore\n ipsum dolor");
    assert_eq!(h.cursor(), Position::new(1, 0));
}

#[test]
fn replace_with_tab_writes_tab() {
    let mut h = Harness::new("abc");
    h.feed("r<tab>");
    assert_eq!(h.text(), "\tbc");
    assert_eq!(h.cursor(), Position::new(0, 0));
}

#[test]
fn recorded_search_and_delete_replays_once() {
    let mut h = Harness::new("foo bar baz bat");
    h.feed(":start<cr>/ba<cr>x:stop<cr>:rep<cr>");
    assert_eq!(h.text(), "foo ar az bat");
    assert_eq!(h.cursor(), Position::new(0, 7));
}

#[test]
fn goto_line_commands() {
    let mut h = Harness::new("one\ntwo\nthree\nfour");
    h.feed("G");
    assert_eq!(h.cursor(), Position::new(3, 0));
    h.feed("gg");
    assert_eq!(h.cursor(), Position::new(0, 0));
    h.feed("3gg");
    assert_eq!(h.cursor(), Position::new(2, 0));
    h.feed("2G");
    assert_eq!(h.cursor(), Position::new(1, 0));
}

#[test]
fn find_and_till_motions() {
    let mut h = Harness::new("alpha beta gamma");
    h.feed("fa");
    assert_eq!(h.cursor(), Position::new(0, 4));
    h.feed("2fa");
    assert_eq!(h.cursor(), Position::new(0, 12));
    h.feed("Tb");
    assert_eq!(h.cursor(), Position::new(0, 7));
}

#[test]
fn join_lines_with_count() {
    let mut h = Harness::new("one\n  two\nthree");
    h.feed("3J");
    assert_eq!(h.text(), "one two three");
}

#[test]
fn open_below_and_type() {
    let mut h = Harness::new("top\nbottom");
    h.feed("omid<esc>");
    assert_eq!(h.text(), "top\nmid\nbottom");
    assert_eq!(h.cursor(), Position::new(1, 2));
}

#[test]
fn undo_and_redo_round_trip() {
    let mut h = Harness::new("abcdef");
    h.feed("3x");
    assert_eq!(h.text(), "def");
    h.feed("u");
    assert_eq!(h.text(), "abcdef");
    h.feed("<c-r>");
    assert_eq!(h.text(), "def");
}

#[test]
fn search_backward_and_repeat() {
    let mut h = Harness::new("ab ab ab");
    h.feed("$?ab<cr>");
    assert_eq!(h.cursor(), Position::new(0, 6));
    h.feed("n");
    assert_eq!(h.cursor(), Position::new(0, 3));
    h.feed("N");
    assert_eq!(h.cursor(), Position::new(0, 6));
}
