use super::*;
use crate::widget::message::Sender;

fn entry(text: &str) -> Message {
    Message::new(Sender::You, text)
}

// =========================================================================
// BufferSurface
// =========================================================================

#[test]
fn buffer_scroll_to_end_reaches_max_scroll() {
    let mut surface = BufferSurface::new(3);
    for i in 0..10 {
        surface.append_entry(&entry(&i.to_string()));
        surface.scroll_to_end();
        assert_eq!(surface.scroll_top(), surface.max_scroll());
    }
    assert_eq!(surface.max_scroll(), 7);
    assert_eq!(surface.visible_lines(), ["You: 7", "You: 8", "You: 9"]);
}

#[test]
fn buffer_short_log_does_not_scroll() {
    let mut surface = BufferSurface::new(5);
    surface.append_entry(&entry("one"));
    surface.scroll_to_end();
    assert_eq!(surface.scroll_top(), 0);
    assert_eq!(surface.visible_lines(), ["You: one"]);
}

#[test]
fn buffer_scroll_to_clamps() {
    let mut surface = BufferSurface::new(2);
    for i in 0..4 {
        surface.append_entry(&entry(&i.to_string()));
    }
    surface.scroll_to(1);
    assert_eq!(surface.visible_lines(), ["You: 1", "You: 2"]);
    surface.scroll_to(100);
    assert_eq!(surface.scroll_top(), 2);
}

#[test]
fn buffer_tracks_visibility_and_input() {
    let mut surface = BufferSurface::default();
    assert!(!surface.is_visible());
    surface.set_panel_visible(true);
    assert!(surface.is_visible());
    surface.set_input("draft");
    assert_eq!(surface.input(), "draft");
    surface.set_input("");
    assert_eq!(surface.input(), "");
}

// =========================================================================
// TerminalSurface
// =========================================================================

fn output(surface: TerminalSurface<Vec<u8>>) -> String {
    String::from_utf8(surface.into_inner()).unwrap()
}

#[test]
fn terminal_prints_entries_while_open() {
    let mut surface = TerminalSurface::new(Vec::new());
    surface.set_panel_visible(true);
    surface.append_entry(&entry("hi"));
    surface.append_entry(&Message::new(Sender::Bot, "hello"));
    assert_eq!(output(surface), "-- chat open --\nYou: hi\nBot: hello\n");
}

#[test]
fn terminal_holds_entries_while_closed() {
    let mut surface = TerminalSurface::new(Vec::new());
    surface.append_entry(&Message::new(Sender::Bot, "late reply"));
    surface.set_panel_visible(true);
    assert_eq!(output(surface), "-- chat open --\nBot: late reply\n");
}

#[test]
fn terminal_ignores_redundant_visibility_changes() {
    let mut surface = TerminalSurface::new(Vec::new());
    surface.set_panel_visible(false);
    surface.set_panel_visible(true);
    surface.set_panel_visible(true);
    surface.set_panel_visible(false);
    assert_eq!(output(surface), "-- chat open --\n-- chat closed --\n");
}

#[test]
fn terminal_prints_notice_even_while_closed() {
    let mut surface = TerminalSurface::new(Vec::new());
    surface.show_notice("type /toggle to open");
    assert_eq!(output(surface), "-- type /toggle to open\n");
}
