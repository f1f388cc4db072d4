//! `go` threads: sharing, joining, failures and cooperative close.

use super::{kind_of, run_src, value_of};
use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

#[test]
fn wait_joins_the_thread() {
    let source = "run int {\n\
                  \x20arr.int out\n\
                  \x20thread t = go { out += 5 }\n\
                  \x20wait(t)\n\
                  \x20return out[0]\n\
                  }";
    assert_eq!(value_of(source), Value::Int(5));
}

#[test]
fn threads_copy_scalars_at_spawn() {
    let source = "run int {\n\
                  \x20int a = 1\n\
                  \x20arr.int out\n\
                  \x20thread t = go { out += a }\n\
                  \x20a = 2\n\
                  \x20wait(t)\n\
                  \x20return out[0] * 10 + a\n\
                  }";
    assert_eq!(value_of(source), Value::Int(12));
}

#[test]
fn threads_share_containers_and_output() {
    let source = "run int {\n\
                  \x20arr.int out\n\
                  \x20thread a = go { out += 1 }\n\
                  \x20thread b = go {\n\
                  \x20 out += 2\n\
                  \x20 print(\"b\")\n\
                  \x20}\n\
                  \x20wait(a)\n\
                  \x20wait(b)\n\
                  \x20wait(b)\n\
                  \x20int s\n\
                  \x20for v in out { s += v }\n\
                  \x20return s\n\
                  }";
    let outcome = run_src(source);
    assert_eq!(outcome.result.unwrap(), Some(Value::Int(3)));
    assert_eq!(outcome.output, "b");
}

#[test]
fn thread_failure_is_reported_after_the_entry_returns() {
    let source = "run {\n\
                  \x20thread t = go { error(\"in thread\") }\n\
                  \x20wait(t)\n\
                  }";
    let err = run_src(source).result.unwrap_err();
    let Error::Thread { thread, source } = &err else {
        panic!("expected a thread error, got {err}");
    };
    assert_eq!(*thread, 1);
    assert_eq!(source.position().map(|pos| pos.line), Some(2));
    assert_eq!(
        kind_of(&err),
        RuntimeErrorKind::Custom {
            message: "in thread".to_string()
        }
    );
}

#[test]
fn entry_failure_closes_running_threads() {
    let source = "run {\n\
                  \x20thread t = go {\n\
                  \x20 while true { sleep(10) }\n\
                  \x20}\n\
                  \x20error(\"entry\")\n\
                  }";
    let outcome = run_src(source);
    let err = outcome.result.unwrap_err();
    assert_eq!(
        kind_of(&err),
        RuntimeErrorKind::Custom {
            message: "entry".to_string()
        }
    );
    assert!(matches!(err, Error::Runtime { .. }));

    let shared = outcome.shared.unwrap();
    let deadline = Instant::now() + Duration::from_secs(10);
    while shared.hub.live() > 0 {
        assert!(Instant::now() < deadline, "thread did not observe close");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn long_operand_chain_in_a_thread() {
    let source = format!(
        "run int {{\n arr.int out\n thread t = go {{ out += 0{} }}\n wait(t)\n return out[0]\n}}",
        "+1".repeat(20_000)
    );
    assert_eq!(value_of(&source), Value::Int(20_000));
}

#[test]
fn sleep_returns_after_the_delay() {
    let started = Instant::now();
    let source = "run {\n sleep(30)\n}";
    assert!(run_src(source).result.is_ok());
    assert!(started.elapsed() >= Duration::from_millis(30));
}
