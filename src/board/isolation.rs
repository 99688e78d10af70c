use std::fmt;

use super::{GameState, Move};

const DIRECTIONS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

pub const DEFAULT_SIZE: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self { Player::One => Player::Two, Player::Two => Player::One }
    }

    fn idx(self) -> usize {
        match self { Player::One => 0, Player::Two => 1 }
    }
}

/// Knight-move Isolation. Every visited cell stays blocked for the rest of the game;
/// the side to move with no reachable blank cell loses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    blocked: Vec<bool>,
    locations: [Option<Move>; 2],
    active: Player,
    move_count: usize,
}

impl Default for Board {
    fn default() -> Self { Self::new(DEFAULT_SIZE, DEFAULT_SIZE) }
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            blocked: vec![false; width * height],
            locations: [None, None],
            active: Player::One,
            move_count: 0,
        }
    }

    /// Put `player` on `cell` without passing the turn. Used to set up positions.
    pub fn place(mut self, player: Player, cell: impl Into<Move>) -> Self {
        let cell = cell.into();
        if let Some(i) = self.index(cell) {
            self.blocked[i] = true;
            self.locations[player.idx()] = Some(cell);
        }
        self
    }

    pub fn block(mut self, cell: impl Into<Move>) -> Self {
        if let Some(i) = self.index(cell.into()) { self.blocked[i] = true; }
        self
    }

    pub fn with_active(mut self, player: Player) -> Self {
        self.active = player;
        self
    }

    pub fn height(&self) -> usize { self.height }

    pub fn move_count(&self) -> usize { self.move_count }

    pub fn is_blank(&self, cell: Move) -> bool {
        self.index(cell).map_or(false, |i| !self.blocked[i])
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        !mv.is_none() && self.active_moves().contains(&mv)
    }

    /// Play `mv` for the side to move, rejecting anything not in its legal-move list.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), String> {
        if !self.is_legal(mv) { return Err(format!("Illegal move: {}", mv)); }
        self.play(mv);
        Ok(())
    }

    fn play(&mut self, mv: Move) {
        if let Some(i) = self.index(mv) { self.blocked[i] = true; }
        self.locations[self.active.idx()] = Some(mv);
        self.active = self.active.other();
        self.move_count += 1;
    }

    fn index(&self, cell: Move) -> Option<usize> {
        let in_bounds = cell.row >= 0 && cell.col >= 0
            && (cell.row as usize) < self.height && (cell.col as usize) < self.width;
        if in_bounds { Some(cell.row as usize * self.width + cell.col as usize) } else { None }
    }
}

impl GameState for Board {
    type Player = Player;

    fn active_player(&self) -> Player { self.active }

    fn opponent(&self, player: Player) -> Player { player.other() }

    fn legal_moves(&self, player: Player) -> Vec<Move> {
        let Some(from) = self.locations[player.idx()] else { return self.blank_spaces(); };
        DIRECTIONS.iter()
            .map(|&(dr, dc)| Move::new(from.row + dr, from.col + dc))
            .filter(|&m| self.is_blank(m))
            .collect()
    }

    fn forecast(&self, mv: Move) -> Self {
        let mut child = self.clone();
        child.play(mv);
        child
    }

    fn is_loser(&self, player: Player) -> bool {
        player == self.active && self.legal_moves(self.active).is_empty()
    }

    fn is_winner(&self, player: Player) -> bool {
        player == self.active.other() && self.legal_moves(self.active).is_empty()
    }

    fn player_location(&self, player: Player) -> Option<Move> { self.locations[player.idx()] }

    fn blank_spaces(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(self.blocked.len());
        for r in 0..self.height {
            for c in 0..self.width {
                if !self.blocked[r * self.width + c] { out.push(Move::new(r as i32, c as i32)); }
            }
        }
        out
    }

    fn width(&self) -> usize { self.width }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.height {
            for c in 0..self.width {
                let cell = Move::new(r as i32, c as i32);
                let ch = if self.locations[0] == Some(cell) { '1' }
                    else if self.locations[1] == Some(cell) { '2' }
                    else if self.blocked[r * self.width + c] { '#' }
                    else { '.' };
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
