// src/core/history.rs

use serde::Serialize;
use std::collections::VecDeque;

use crate::{models::InputDict, settings::HistorySettings};

/// A raw input line and what it was parsed into.
pub type HistoryNote = (String, InputDict);

/// A bounded log of processed input, oldest first.
///
/// When full, a history that allows overflow drops its oldest note to make
/// room; otherwise new notes are refused.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CommandHistory {
    max_size: usize,
    is_write_overflow: bool,
    notes: VecDeque<HistoryNote>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::from_settings(&HistorySettings::default())
    }
}

impl CommandHistory {
    pub fn new(max_size: usize, is_write_overflow: bool) -> Self {
        Self {
            max_size,
            is_write_overflow,
            notes: VecDeque::with_capacity(max_size),
        }
    }

    pub fn from_settings(settings: &HistorySettings) -> Self {
        Self::new(settings.max_size, settings.is_write_overflow)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_write_overflow(&self) -> bool {
        self.is_write_overflow
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Appends a note. Returns `false` if the note was refused.
    pub fn write(&mut self, input: &str, dict: InputDict) -> bool {
        if self.max_size == 0 {
            return false;
        }
        if self.notes.len() >= self.max_size {
            if !self.is_write_overflow {
                return false;
            }
            self.notes.pop_front();
        }
        self.notes.push_back((input.to_string(), dict));
        true
    }

    /// Reads a note counting back from the newest (`0`). Indexes past the
    /// oldest note are clamped to it.
    pub fn read(&self, index: usize) -> Option<&HistoryNote> {
        let newest = self.notes.len().checked_sub(1)?;
        self.notes.get(newest - index.min(newest))
    }

    pub fn notes(&self) -> impl Iterator<Item = &HistoryNote> {
        self.notes.iter()
    }

    pub fn inputs(&self) -> Vec<&str> {
        self.notes.iter().map(|(input, _)| input.as_str()).collect()
    }

    pub fn dicts(&self) -> Vec<&InputDict> {
        self.notes.iter().map(|(_, dict)| dict).collect()
    }
}
