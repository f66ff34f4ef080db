//! Action stack - the creature's pending behaviours, most specific first
//!
//! New intents are pushed to the front and completed ones popped from the
//! front. The tail is a permanent `Idle` entry, so popping always falls
//! back to whatever the creature was doing before.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Behaviour tag at one level of the action stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Idle,
    WalkToTile,
    DigTile,
    AttackCreature,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Idle => "idle",
            ActionKind::WalkToTile => "walkToTile",
            ActionKind::DigTile => "digTile",
            ActionKind::AttackCreature => "attackCreature",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStack {
    entries: VecDeque<ActionKind>,
}

impl Default for ActionStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionStack {
    /// A stack holding only the `Idle` sentinel
    pub fn new() -> Self {
        Self {
            entries: VecDeque::from([ActionKind::Idle]),
        }
    }

    /// Restore a stack verbatim, e.g. from a saved game
    ///
    /// No sentinel is added; the cognition step reports a stack restored
    /// without one.
    pub fn from_entries(entries: impl IntoIterator<Item = ActionKind>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn front(&self) -> Option<ActionKind> {
        self.entries.front().copied()
    }

    pub fn push_front(&mut self, action: ActionKind) {
        self.entries.push_front(action);
    }

    /// Pop the current action; the last entry is never removed
    pub fn pop_front(&mut self) -> Option<ActionKind> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop_front()
    }

    /// Swap the current action for `action` without exposing what is below
    pub fn replace_front(&mut self, action: ActionKind) {
        if self.pop_front().is_none() {
            tracing::warn!("replace_front on sentinel, pushing {} instead", action.name());
        }
        self.push_front(action);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the creature has nothing to do beyond the sentinel
    pub fn is_idle(&self) -> bool {
        self.entries.len() == 1 && self.front() == Some(ActionKind::Idle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionKind> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stack_is_idle() {
        let stack = ActionStack::new();
        assert_eq!(stack.len(), 1);
        assert!(stack.is_idle());
    }

    #[test]
    fn test_sentinel_never_popped() {
        let mut stack = ActionStack::new();
        assert_eq!(stack.pop_front(), None);
        assert_eq!(stack.front(), Some(ActionKind::Idle));
    }

    #[test]
    fn test_push_pop_reverts_to_previous() {
        let mut stack = ActionStack::new();
        stack.push_front(ActionKind::DigTile);
        stack.push_front(ActionKind::WalkToTile);
        assert_eq!(stack.pop_front(), Some(ActionKind::WalkToTile));
        assert_eq!(stack.front(), Some(ActionKind::DigTile));
        assert_eq!(stack.pop_front(), Some(ActionKind::DigTile));
        assert!(stack.is_idle());
    }

    #[test]
    fn test_replace_front() {
        let mut stack = ActionStack::new();
        stack.push_front(ActionKind::DigTile);
        stack.replace_front(ActionKind::WalkToTile);
        let order: Vec<_> = stack.iter().copied().collect();
        assert_eq!(order, vec![ActionKind::WalkToTile, ActionKind::Idle]);
    }

    #[test]
    fn test_restored_empty_stack() {
        let stack = ActionStack::from_entries([]);
        assert!(stack.is_empty());
        assert_eq!(stack.front(), None);
    }
}
