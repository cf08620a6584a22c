//! Per-turn, per-page expansion flags for citation groups

use std::collections::HashMap;

/// Identifies one citation group on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpansionKey {
    pub turn_index: usize,
    pub page: u32,
}

impl ExpansionKey {
    pub fn new(turn_index: usize, page: u32) -> Self {
        Self { turn_index, page }
    }
}

/// Expanded/collapsed state of citation groups.
///
/// Keys that were never toggled read as collapsed.
#[derive(Debug, Clone, Default)]
pub struct ExpansionTracker {
    flags: HashMap<ExpansionKey, bool>,
}

impl ExpansionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `(turn_index, page)` and return the new value
    pub fn toggle(&mut self, turn_index: usize, page: u32) -> bool {
        let flag = self
            .flags
            .entry(ExpansionKey::new(turn_index, page))
            .or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_expanded(&self, turn_index: usize, page: u32) -> bool {
        self.flags
            .get(&ExpansionKey::new(turn_index, page))
            .copied()
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }

    /// Number of keys that have been toggled at least once
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
