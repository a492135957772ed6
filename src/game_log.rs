use std::collections::VecDeque;
use serde::{Deserialize, Serialize};

/// Append-only narrative of the game, newest last. Only the most recent `capacity` lines are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    capacity: usize,
    entries: VecDeque<String>,
}

impl GameLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::debug!("{line}");

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item=&str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    /// The last `n` lines joined, oldest first.
    pub fn tail(&self, n: usize) -> String {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect::<Vec<String>>().join("\n")
    }
}
