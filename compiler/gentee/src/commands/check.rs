//! The `check` command: compile without running.

use gentee::check_source;

use super::{fail, read_file};

pub fn check_file(path: &str) {
    let source = read_file(path);
    match check_source(&source, path) {
        Ok(_) => println!("{path}: ok"),
        Err(err) => fail(&err),
    }
}
