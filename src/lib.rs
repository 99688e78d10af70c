// Time-bounded game-tree search agents for Isolation
pub mod board;
pub mod search;
pub mod selfplay;

pub use board::{GameState, Move};
pub use search::{Agent, AlphaBetaSearcher, Decision, MinimaxSearcher, SearchError, SearchParams};
