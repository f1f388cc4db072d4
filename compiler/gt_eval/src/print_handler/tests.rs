#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn println_appends_a_newline() {
    let handler = buffer_handler();
    handler.print("a");
    handler.println("b");
    assert_eq!(handler.output(), "ab\n");
}

#[test]
fn clear_empties_the_buffer() {
    let handler = buffer_handler();
    handler.println("hello");
    handler.clear();
    assert!(handler.output().is_empty());
}

#[test]
fn stdout_captures_nothing() {
    let handler = stdout_handler();
    handler.clear();
    assert_eq!(handler.output(), "");
}

#[test]
fn buffer_is_shared_across_threads() {
    let handler = buffer_handler();
    let other = Arc::clone(&handler);
    let worker = std::thread::spawn(move || {
        for _ in 0..50 {
            other.println("a");
        }
    });
    for _ in 0..50 {
        handler.println("b");
    }
    worker.join().unwrap();
    assert_eq!(handler.output().lines().count(), 100);
}
