//! Agent moves

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four grid moves
///
/// The order of [`Action::ALL`] is the index order of every Q-table row:
/// x−1, x+1, y−1, y+1. Greedy ties resolve to the earliest action in it, so
/// an untouched row picks `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    pub const COUNT: usize = 4;
    pub const ALL: [Action; Self::COUNT] =
        [Action::Left, Action::Right, Action::Up, Action::Down];

    pub fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Coordinate delta `(dx, dy)`; rows grow downwards
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(4), None);
    }

    #[test]
    fn test_index_order_follows_deltas() {
        let deltas: Vec<_> = Action::ALL.iter().map(|a| a.delta()).collect();
        assert_eq!(deltas, vec![(-1, 0), (1, 0), (0, -1), (0, 1)]);
    }

    #[test]
    fn test_deltas_are_unit_moves() {
        for action in Action::ALL {
            let (dx, dy) = action.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }
}
