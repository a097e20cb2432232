// src/core/tokenizer.rs

use log::trace;

use crate::models::{RawInputToken, RawTokenType};

/// Splits a line of input into raw tokens.
///
/// Never fails: characters that start no token are dropped, and a string
/// left open runs to the end of the input.
pub fn tokenize(input: &str) -> Vec<RawInputToken> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(&c) = chars.get(i) {
        match c {
            ' ' => {
                tokens.push(RawInputToken::new(RawTokenType::Space, " "));
                i += 1;
            }
            '-' => {
                tokens.push(RawInputToken::new(RawTokenType::Minus, "-"));
                i += 1;
            }
            '!' => {
                tokens.push(RawInputToken::new(RawTokenType::Not, "!"));
                i += 1;
            }
            '\'' | '"' => {
                let (value, next) = read_string(&chars, i + 1, c);
                tokens.push(RawInputToken::new(RawTokenType::String, value));
                i = next;
            }
            c if c.is_alphanumeric() => {
                let (value, next) = read_word(&chars, i);
                tokens.push(RawInputToken::new(RawTokenType::Word, value));
                i = next;
            }
            other => {
                trace!("Skipping character {:?} at {}", other, i);
                i += 1;
            }
        }
        if let Some(token) = tokens.last() {
            trace!("Token: {:?}", token);
        }
    }

    tokens
}

/// Reads a quoted string body starting at `i`. Returns the value and the
/// index just past the closing quote.
fn read_string(chars: &[char], mut i: usize, quote: char) -> (String, usize) {
    let mut value = String::new();

    while let Some(&c) = chars.get(i) {
        if c == quote {
            return (value, i + 1);
        }
        match (c, chars.get(i + 1)) {
            ('\\', Some(&escaped)) if escaped == quote || escaped == '\\' => {
                value.push(escaped);
                i += 2;
            }
            _ => {
                value.push(c);
                i += 1;
            }
        }
    }

    (value, i)
}

fn read_word(chars: &[char], mut i: usize) -> (String, usize) {
    let mut value = String::new();
    while let Some(&c) = chars.get(i) {
        if !c.is_alphanumeric() {
            break;
        }
        value.push(c);
        i += 1;
    }
    (value, i)
}
