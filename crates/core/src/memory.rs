//! Bounded conversation memory.
//!
//! An append-only log of [`Turn`]s capped at a maximum length. When an
//! append would exceed the cap, the oldest turns are evicted from the front
//! until the cap holds again. Eviction is strictly FIFO; there is no notion
//! of pinned turns.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::turn::Turn;

/// Default cap on the number of retained turns.
pub const DEFAULT_MAX_TURNS: usize = 100;

/// The ordered, bounded log of turns owned by a single agent.
///
/// Mutation happens only through [`append`](Self::append) and
/// [`clear`](Self::clear); turns are immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: VecDeque<Turn>,
    max_turns: usize,
}

impl ConversationMemory {
    /// Create an empty memory with the default cap.
    pub fn new() -> Self {
        Self::with_max_turns(DEFAULT_MAX_TURNS)
    }

    /// Create an empty memory with a custom cap.
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            max_turns,
        }
    }

    /// Append a turn, evicting from the front if the cap is exceeded.
    ///
    /// Never evicts more than necessary and never reorders.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// The last `count` turns in original order.
    ///
    /// `count` may exceed the current length; the full log is returned in
    /// that case. Never fails.
    pub fn recent(&self, count: usize) -> Vec<&Turn> {
        let skip = self.turns.len().saturating_sub(count);
        self.turns.iter().skip(skip).collect()
    }

    /// Empty the log unconditionally.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Iterate over all retained turns in order.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The configured cap.
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}
