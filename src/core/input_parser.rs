// src/core/input_parser.rs

use crate::models::{FinalInputToken, InputDict};

/// Folds final tokens into an `InputDict`. Words form the path in order;
/// for repeated flags or options the last one wins.
pub fn parse_input(tokens: Vec<FinalInputToken>) -> InputDict {
    let mut input = InputDict::default();

    for token in tokens {
        match token {
            FinalInputToken::Word { value } => input.path.push(value),
            FinalInputToken::Flag { name, value } => {
                input.flags.insert(name, Some(value));
            }
            FinalInputToken::Option { name, value } => {
                input.options.insert(name, value);
            }
        }
    }

    input
}
