use super::*;

#[test]
fn message_renders_sender_prefix() {
    assert_eq!(Message::new(Sender::You, "hi").to_string(), "You: hi");
    assert_eq!(Message::new(Sender::Bot, "hello").to_string(), "Bot: hello");
    assert_eq!(Message::new(Sender::Admin, "later").to_string(), "Admin: later");
    assert_eq!(Message::new(Sender::System, "oops").to_string(), "System: oops");
}

#[test]
fn message_text_is_not_interpreted() {
    let msg = Message::new(Sender::Bot, "<b>bold</b> & more");
    assert_eq!(msg.to_string(), "Bot: <b>bold</b> & more");
}

#[test]
fn log_starts_empty() {
    let log = MessageLog::new();
    assert!(log.is_empty());
    assert_eq!(log.len(), 0);
    assert!(log.last().is_none());
}

#[test]
fn log_push_returns_positions_in_order() {
    let mut log = MessageLog::new();
    assert_eq!(log.push(Message::new(Sender::You, "a")), 0);
    assert_eq!(log.push(Message::new(Sender::Bot, "b")), 1);
    assert_eq!(log.push(Message::new(Sender::You, "c")), 2);
    assert_eq!(log.len(), 3);
    assert_eq!(log.last(), Some(&Message::new(Sender::You, "c")));
}

#[test]
fn log_lines_preserve_push_order() {
    let mut log = MessageLog::new();
    log.push(Message::new(Sender::You, "first"));
    log.push(Message::new(Sender::Bot, "second"));
    log.push(Message::new(Sender::System, "third"));
    assert_eq!(log.lines(), vec!["You: first", "Bot: second", "System: third"]);
    let senders: Vec<Sender> = log.iter().map(|m| m.sender).collect();
    assert_eq!(senders, vec![Sender::You, Sender::Bot, Sender::System]);
}
