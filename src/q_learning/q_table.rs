//! Q-table implementation for grid navigation

use std::collections::HashMap;

use crate::{maze::Position, q_learning::action::Action};

/// Action values for one state, index-aligned with [`Action::ALL`]
pub type ActionValues = [f64; Action::COUNT];

/// Q-table mapping grid positions to per-action values
///
/// States are never enumerated up front. A row is created, all zeros, the
/// first time [`QTable::entry`] touches it.
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values: position -> value per action
    q_values: HashMap<Position, ActionValues>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Row for `state`, if it has been created
    pub fn get(&self, state: Position) -> Option<&ActionValues> {
        self.q_values.get(&state)
    }

    /// Row for `state`, inserting zeros on first access
    pub fn entry(&mut self, state: Position) -> &mut ActionValues {
        self.q_values.entry(state).or_insert([0.0; Action::COUNT])
    }

    /// Q-value for a state-action pair; 0.0 for unseen states
    pub fn value(&self, state: Position, action: Action) -> f64 {
        self.get(state)
            .map(|values| values[action.index()])
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: Position, action: Action, value: f64) {
        self.entry(state)[action.index()] = value;
    }

    pub fn contains(&self, state: Position) -> bool {
        self.q_values.contains_key(&state)
    }

    /// Highest value in the row, creating the row if needed
    pub fn max_q(&mut self, state: Position) -> f64 {
        self.entry(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for `state`; ties go to the earliest action
    ///
    /// Returns `None` when the state has no row yet.
    pub fn greedy_action(&self, state: Position) -> Option<Action> {
        let values = self.get(state)?;
        let mut best = 0;
        for (idx, &value) in values.iter().enumerate().skip(1) {
            if value > values[best] {
                best = idx;
            }
        }
        Action::from_index(best)
    }

    /// Q-learning update for a move that reached `next_state`
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
    ) {
        self.entry(state);
        let max_next_q = self.max_q(next_state);
        let current_q = self.entry(state)[action.index()];
        let td_target = reward + self.discount_factor * max_next_q;
        let new_q = current_q + self.learning_rate * (td_target - current_q);
        self.set(state, action, new_q);
    }

    /// Update for a rejected move: there is no successor, so only the
    /// immediate reward counts
    ///
    /// Q(s,a) ← Q(s,a) + α[r - Q(s,a)]
    pub fn rejected_move_update(&mut self, state: Position, action: Action, reward: f64) {
        let learning_rate = self.learning_rate;
        let q = &mut self.entry(state)[action.index()];
        *q += learning_rate * (reward - *q);
    }

    /// Drop every row
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Number of states with a row
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &ActionValues)> {
        self.q_values.iter()
    }
}
