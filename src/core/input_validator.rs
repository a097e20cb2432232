// src/core/input_validator.rs

use log::{debug, trace};
use serde_json::Value;

use crate::{
    core::diagnostics::{IssueKind, Reporter, ValidationError},
    models::{CommandNode, CommandsConfig, FinalInputToken, RawInputToken, RawTokenType},
};

/// Turns raw tokens into words, flags and options.
///
/// A single pass over the tokens; every handler leaves the cursor just past
/// what it consumed. `-name` is a flag, `-!name` a negated flag, and two or
/// more minuses open an option followed by its value.
#[derive(Debug)]
pub struct InputValidator<'a> {
    reporter: &'a mut Reporter,
    config: Option<&'a CommandsConfig>,
    tokens: &'a [RawInputToken],
    result: Vec<FinalInputToken>,
    cursor: usize,
}

impl<'a> InputValidator<'a> {
    pub fn new(
        reporter: &'a mut Reporter,
        config: Option<&'a CommandsConfig>,
        tokens: &'a [RawInputToken],
    ) -> Self {
        Self {
            reporter,
            config,
            tokens,
            result: Vec::new(),
            cursor: 0,
        }
    }

    pub fn validate_input(mut self) -> Result<Vec<FinalInputToken>, ValidationError> {
        let tokens = self.tokens;
        debug!("Validating {} raw tokens", tokens.len());

        while let Some(token) = tokens.get(self.cursor) {
            trace!("Token {} of {}: {:?}", self.cursor, tokens.len(), token);
            match token.kind {
                RawTokenType::Word | RawTokenType::String => {
                    self.result.push(FinalInputToken::Word {
                        value: token.value.clone(),
                    });
                    self.cursor += 1;
                }
                RawTokenType::Space => self.cursor += 1,
                RawTokenType::Minus => self.validate_token_minus()?,
                RawTokenType::Not => {
                    self.reporter.report(
                        IssueKind::InputStructure,
                        format!(t!("input.unknown_token"), token = token.value),
                        t!("fix.skipping"),
                    )?;
                    self.cursor += 1;
                }
            }
        }

        self.validate_fallback_defaults();
        Ok(self.result)
    }

    fn peek_kind(&self) -> Option<RawTokenType> {
        self.tokens.get(self.cursor).map(|t| t.kind)
    }

    /// Checks that `offset` more tokens are available from the cursor.
    /// A missing lookahead is reported and `false` returned.
    fn expect_end(&mut self, offset: usize) -> Result<bool, ValidationError> {
        if self.cursor + offset <= self.tokens.len() {
            return Ok(true);
        }
        self.reporter.report(
            IssueKind::InputStructure,
            t!("input.end_of_input").to_string(),
            t!("fix.removing"),
        )?;
        Ok(false)
    }

    /// One minus opens a flag, two or more an option.
    fn validate_token_minus(&mut self) -> Result<(), ValidationError> {
        let start = self.cursor;
        while self.peek_kind() == Some(RawTokenType::Minus) {
            self.cursor += 1;
        }

        if self.cursor - start == 1 {
            self.validate_token_flag()
        } else {
            self.validate_token_option()
        }
    }

    fn validate_token_flag(&mut self) -> Result<(), ValidationError> {
        if !self.expect_end(1)? {
            return Ok(());
        }

        let mut value = true;
        if self.peek_kind() == Some(RawTokenType::Not) {
            value = false;
            self.cursor += 1;
            if !self.expect_end(1)? {
                return Ok(());
            }
        }

        let name = self.validate_name_tokens();
        if name.is_empty() {
            return self.reporter.report(
                IssueKind::InputStructure,
                t!("input.flag_name_missing").to_string(),
                t!("fix.skipping"),
            );
        }

        trace!("Flag '{}' = {}", name, value);
        self.result.push(FinalInputToken::Flag { name, value });
        Ok(())
    }

    fn validate_token_option(&mut self) -> Result<(), ValidationError> {
        if !self.expect_end(1)? {
            return Ok(());
        }

        let name = self.validate_name_tokens();
        if name.is_empty() {
            return self.reporter.report(
                IssueKind::InputStructure,
                t!("input.option_name_missing").to_string(),
                t!("fix.skipping"),
            );
        }

        while self.peek_kind() == Some(RawTokenType::Space) {
            self.cursor += 1;
        }
        if !self.expect_end(1)? {
            return Ok(());
        }

        let value = self.validate_name_tokens();
        if value.is_empty() {
            return self.reporter.report(
                IssueKind::InputStructure,
                format!(t!("input.option_value_missing"), name = name),
                t!("fix.skipping"),
            );
        }

        trace!("Option '{}' = '{}'", name, value);
        self.result.push(FinalInputToken::Option {
            name,
            value: Value::String(value),
        });
        Ok(())
    }

    /// Reads a name: a quoted string on its own, or a run of words and
    /// minuses glued together (`a-b`). Empty if neither starts at the cursor.
    fn validate_name_tokens(&mut self) -> String {
        let tokens = self.tokens;
        match tokens.get(self.cursor) {
            Some(token) if token.kind == RawTokenType::String => {
                self.cursor += 1;
                token.value.clone()
            }
            _ => {
                let mut name = String::new();
                while let Some(token) = tokens.get(self.cursor) {
                    if !matches!(token.kind, RawTokenType::Word | RawTokenType::Minus) {
                        break;
                    }
                    name.push_str(&token.value);
                    self.cursor += 1;
                }
                name
            }
        }
    }

    /// Appends the defaults of trailing fallbacks the input left out.
    ///
    /// The written words are walked through the tree first; if they lead
    /// nowhere the result is left as is. Then, while the reached node has a
    /// fallback child, that fallback's default is appended as a word. A
    /// fallback without a default ends the walk.
    fn validate_fallback_defaults(&mut self) {
        let Some(config) = self.config else {
            return;
        };

        let mut level: &[CommandNode] = &config.commands;
        for token in &self.result {
            let FinalInputToken::Word { value } = token else {
                continue;
            };
            match CommandNode::find_positional(level, value) {
                Some(node) => level = node.children(),
                None => {
                    trace!("Path stops at '{}', no defaults to fill", value);
                    return;
                }
            }
        }

        while let Some(CommandNode::Fallback { name, default, children }) = level
            .iter()
            .find(|node| matches!(node, CommandNode::Fallback { .. }))
        {
            let value = match default {
                Value::Null => break,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            debug!("Filling fallback '{}' with its default '{}'", name, value);
            self.result.push(FinalInputToken::Word { value });
            level = children;
        }
    }
}
