//! Out-of-band check state for virtual rows.
//!
//! An owner-data list view cannot remember a check box per row, so the list
//! keeps the state itself, keyed by model object.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    Indeterminate,
}

impl CheckState {
    /// State-image index used by the control (1 = unchecked, 2 = checked).
    pub fn state_image_index(self) -> u32 {
        match self {
            CheckState::Unchecked => 1,
            CheckState::Checked => 2,
            CheckState::Indeterminate => 3,
        }
    }

    /// State after a user click. Indeterminate goes to checked.
    pub fn toggled(self) -> Self {
        match self {
            CheckState::Checked => CheckState::Unchecked,
            _ => CheckState::Checked,
        }
    }
}

/// Model to check-state map. Entries appear on first write and are never pruned.
#[derive(Clone, Debug)]
pub struct CheckStateMap<M> {
    states: HashMap<M, CheckState>,
}

impl<M> Default for CheckStateMap<M> {
    fn default() -> Self {
        Self { states: HashMap::new() }
    }
}

impl<M: Clone + Eq + Hash> CheckStateMap<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects never written read as unchecked.
    pub fn get(&self, model: &M) -> CheckState {
        self.states.get(model).copied().unwrap_or_default()
    }

    pub fn set(&mut self, model: M, state: CheckState) {
        self.states.insert(model, state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn tracked(&self) -> impl Iterator<Item = &M> {
        self.states.keys()
    }

    pub fn checked(&self) -> impl Iterator<Item = &M> {
        self.states
            .iter()
            .filter(|(_, s)| **s == CheckState::Checked)
            .map(|(m, _)| m)
    }
}
