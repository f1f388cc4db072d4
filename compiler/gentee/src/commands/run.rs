//! The `run` command: compile a script and execute its `run` block.

use gentee::{run_source, RunOptions};

use super::{fail, read_file};

/// Run `path` with `args` as the script's command line. A returned value is
/// printed on its own line.
pub fn run_file(path: &str, args: Vec<String>) {
    let source = read_file(path);
    let options = RunOptions {
        args,
        ..RunOptions::default()
    };
    match run_source(&source, path, options) {
        Ok(Some(value)) => println!("{value}"),
        Ok(None) => {}
        Err(err) => fail(&err),
    }
}
