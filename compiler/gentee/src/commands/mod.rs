//! Command implementations for the `gentee` binary.

mod check;
mod debug;
mod run;

pub use check::check_file;
pub use debug::lex_file;
pub use run::run_file;

/// Read a source file or exit with a readable message.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Print a positioned error and exit with failure.
pub(super) fn fail(err: &gentee::Error) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
