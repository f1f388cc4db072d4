//! Gentee command-line driver.

mod commands;

use commands::{check_file, lex_file, run_file};

fn main() {
    gentee::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: gentee run <file.g> [-- args...]");
                std::process::exit(1);
            };
            // Everything after `--` belongs to the script.
            let script_args = match args[3..].iter().position(|arg| arg == "--") {
                Some(at) => args[3 + at + 1..].to_vec(),
                None => args[3..].to_vec(),
            };
            run_file(path, script_args);
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: gentee check <file.g>");
                std::process::exit(1);
            }
            check_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: gentee lex <file.g>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Gentee {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare script path runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("g"))
            {
                run_file(command, args[2..].to_vec());
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Gentee scripting language");
    println!();
    println!("Usage: gentee <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.g> [-- args...]  Compile and run a script");
    println!("  check <file.g>             Compile only, reporting the first error");
    println!("  lex <file.g>               Tokenize and display tokens");
    println!("  help                       Show this help message");
    println!("  version                    Show version information");
    println!();
    println!("Logging:");
    println!("  GENTEE_LOG=debug           Enable tracing output (falls back to RUST_LOG)");
    println!();
    println!("Examples:");
    println!("  gentee run hello.g");
    println!("  gentee run copy.g -- -src=a.txt -dst b.txt");
    println!("  gentee check lib.g");
}
