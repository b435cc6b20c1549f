//! Queue item state for one enqueued candidate.

use chrono::{DateTime, Local};

use super::Candidate;

/// Processing state of a queued candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// Waiting for the worker
    Pending,

    /// Currently being transformed
    Running,

    /// Note written and source relocated
    Succeeded,

    /// Terminal failure for this attempt, with a human-readable reason
    Failed(String),
}

/// A candidate wrapped with pipeline state. Created on enqueue, mutated only
/// by the queue worker, discarded after the terminal state is reported.
#[derive(Debug, Clone)]
pub struct QueueItem {
    pub candidate: Candidate,
    pub state: ItemState,
    pub enqueued_at: DateTime<Local>,
}

impl QueueItem {
    pub fn new(candidate: Candidate) -> Self {
        Self {
            candidate,
            state: ItemState::Pending,
            enqueued_at: Local::now(),
        }
    }

    /// True once the item reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, ItemState::Succeeded | ItemState::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn candidate() -> Candidate {
        Candidate::new(
            PathBuf::from("/notes/a.m4a"),
            "m4a".to_string(),
            Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_item_is_pending() {
        let item = QueueItem::new(candidate());
        assert_eq!(item.state, ItemState::Pending);
        assert!(!item.is_terminal());
    }

    #[test]
    fn test_terminal_states() {
        let mut item = QueueItem::new(candidate());
        item.state = ItemState::Succeeded;
        assert!(item.is_terminal());

        item.state = ItemState::Failed("boom".to_string());
        assert!(item.is_terminal());
    }
}
