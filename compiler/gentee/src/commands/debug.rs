//! The `lex` command: display the token stream.

use gentee::token_listing;

use super::{fail, read_file};

pub fn lex_file(path: &str) {
    let source = read_file(path);
    match token_listing(&source, path) {
        Ok(tokens) => {
            println!("Tokens for '{}' ({} tokens):", path, tokens.len());
            for token in tokens {
                println!("  {token}");
            }
        }
        Err(err) => fail(&err),
    }
}
