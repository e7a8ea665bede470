//! Bounded sliding-window conversation memory.
//!
//! The store keeps the most recent N turn pairs (user + assistant). Capacity
//! is enforced explicitly on every insert rather than relying on collection
//! behavior, so the eviction policy is visible at the call site.

use std::collections::VecDeque;

/// Who authored a stored turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Capitalized label used when rendering prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One user message or one assistant reply, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered log of past turns with FIFO eviction.
///
/// Turns are appended in user/assistant pairs by the turn controller; the
/// store itself only guarantees capacity and eviction order, not pairing.
#[derive(Debug)]
pub struct History {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl History {
    /// Create a store remembering `turn_count` user/assistant pairs.
    ///
    /// `turn_count` below 1 is clamped to 1, so the store always holds at
    /// least one full pair.
    pub fn with_remembered_turns(turn_count: usize) -> Self {
        let capacity = turn_count.max(1) * 2;
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn at the tail, evicting the oldest when full.
    pub fn push(&mut self, turn: Turn) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// Ordered copy of the current turns, oldest first.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_insertion_order() {
        let mut history = History::with_remembered_turns(3);
        history.push(Turn::user("A"));
        history.push(Turn::assistant("B"));
        let snapshot = history.snapshot();
        assert_eq!(snapshot, vec![Turn::user("A"), Turn::assistant("B")]);
    }

    #[test]
    fn eviction_drops_oldest_first() {
        let mut history = History::with_remembered_turns(1);
        history.push(Turn::user("A"));
        history.push(Turn::assistant("B"));
        history.push(Turn::user("C"));
        history.push(Turn::assistant("D"));
        assert_eq!(
            history.snapshot(),
            vec![Turn::user("C"), Turn::assistant("D")]
        );
    }

    #[test]
    fn window_holds_exactly_the_most_recent_pairs() {
        let mut history = History::with_remembered_turns(2);
        for i in 0..10 {
            history.push(Turn::user(format!("u{i}")));
            history.push(Turn::assistant(format!("a{i}")));
        }
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0], Turn::user("u8"));
        assert_eq!(snapshot[3], Turn::assistant("a9"));
    }

    #[test]
    fn zero_turn_count_clamps_to_one_pair() {
        let mut history = History::with_remembered_turns(0);
        history.push(Turn::user("A"));
        history.push(Turn::assistant("B"));
        history.push(Turn::user("C"));
        assert_eq!(
            history.snapshot(),
            vec![Turn::assistant("B"), Turn::user("C")]
        );
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let mut history = History::with_remembered_turns(2);
        history.push(Turn::user("A"));
        let _ = history.snapshot();
        let _ = history.snapshot();
        assert_eq!(history.len(), 1);
    }
}
