//! Actions produced by one mode touch only the state that mode may
//! reach: query editing never mutates text, motions never open menus.

mod common;
use common::Harness;
use quill_state::InputMode;

#[test]
fn normal_motions_leave_overlays_alone() {
    let mut h = Harness::new("foo bar baz");
    h.feed("ww$0gge");
    assert!(!h.state.menu.visible);
    assert!(h.state.search.query.is_empty());
    assert_eq!(h.text(), "foo bar baz");
}

#[test]
fn search_typing_never_mutates_text() {
    let mut h = Harness::new("alpha beta");
    h.feed("/beta");
    assert_eq!(h.state.input_mode, InputMode::Search);
    assert_eq!(h.text(), "alpha beta");
    assert_eq!(h.state.search.query, "beta");
    h.feed("<esc>");
    assert_eq!(h.state.input_mode, InputMode::Normal);
    assert_eq!(h.text(), "alpha beta");
}

#[test]
fn menu_typing_never_mutates_text() {
    let mut h = Harness::new("alpha beta");
    h.feed(":dd");
    assert_eq!(h.state.input_mode, InputMode::Menu);
    // 'dd' went into the menu query, not the buffer.
    assert_eq!(h.text(), "alpha beta");
    assert_eq!(h.state.menu.query, "dd");
    h.feed("<esc>");
    assert_eq!(h.state.input_mode, InputMode::Normal);
    assert_eq!(h.text(), "alpha beta");
}

#[test]
fn menu_backspace_shrinks_then_closes() {
    let mut h = Harness::new("text");
    h.feed(":ab<bs><bs>");
    assert_eq!(h.state.input_mode, InputMode::Menu);
    assert!(h.state.menu.query.is_empty());
    h.feed("<bs>");
    assert_eq!(h.state.input_mode, InputMode::Normal);
}

#[test]
fn search_backspace_to_empty_returns_to_normal() {
    let mut h = Harness::new("text");
    h.feed("/a<bs>");
    assert_eq!(h.state.input_mode, InputMode::Normal);
    assert_eq!(h.text(), "text");
    assert!(h.state.search.committed.is_none());
}

#[test]
fn task_mode_swallows_ordinary_keys() {
    let mut h = Harness::new("text");
    h.state.enter_task_mode();
    h.feed("ddxiq");
    assert_eq!(h.text(), "text");
    assert_eq!(h.state.input_mode, InputMode::Task);
}

#[test]
fn insert_mode_keys_do_not_run_normal_commands() {
    let mut h = Harness::new("");
    h.feed("idd<esc>");
    // 'dd' inserts literally instead of deleting a line.
    assert_eq!(h.text(), "dd");
}
