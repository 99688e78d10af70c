use std::fmt;

use serde::{Deserialize, Serialize};

pub mod isolation;

/// A board coordinate `(row, col)`.
///
/// `Move::NONE` is returned when the side to move has nothing to play; it is
/// never a member of any legal-move list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: i32,
    pub col: i32,
}

impl Move {
    pub const NONE: Move = Move { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Self { Self { row, col } }

    pub fn is_none(&self) -> bool { *self == Self::NONE }
}

impl From<(i32, i32)> for Move {
    fn from((row, col): (i32, i32)) -> Self { Self { row, col } }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Everything the searchers need from a game position.
///
/// Implementations are immutable snapshots: `forecast` returns a new state and
/// leaves `self` untouched, so the search never has to undo a move.
pub trait GameState: Clone {
    type Player: Copy + Eq + fmt::Debug;

    fn active_player(&self) -> Self::Player;

    fn opponent(&self, player: Self::Player) -> Self::Player;

    /// Legal moves for `player`, in a stable enumeration order. May be empty.
    fn legal_moves(&self, player: Self::Player) -> Vec<Move>;

    fn active_moves(&self) -> Vec<Move> { self.legal_moves(self.active_player()) }

    fn forecast(&self, mv: Move) -> Self;

    fn is_loser(&self, player: Self::Player) -> bool;

    fn is_winner(&self, player: Self::Player) -> bool;

    fn player_location(&self, player: Self::Player) -> Option<Move>;

    fn blank_spaces(&self) -> Vec<Move>;

    /// Board width; the board is treated as square for centrality.
    fn width(&self) -> usize;
}
