use isolation_agent::board::isolation::{Board, Player};
use isolation_agent::board::GameState;
use isolation_agent::search::{AlphaBetaSearcher, MinimaxSearcher, SearchParams};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn open_budget() -> f64 { 1.0e9 }

// Every position looks the same, so every root move ties.
fn flat(_: &Board, _: Player) -> f64 { 0.0 }

fn position() -> Board {
    Board::new(7, 7).place(Player::One, (3, 3)).place(Player::Two, (0, 0))
}

#[test]
fn minimax_keeps_first_of_tied_moves() {
    let b = position();
    let moves = b.active_moves();
    for depth in 1..=3 {
        let params = SearchParams { depth, ..SearchParams::default() };
        let mut mm = MinimaxSearcher::new(params, flat, SmallRng::seed_from_u64(0));
        assert_eq!(mm.get_move(&b, &open_budget), moves[0], "depth {depth}");
    }
}

#[test]
fn alphabeta_keeps_last_of_tied_moves() {
    let b = position();
    let moves = b.active_moves();
    let last = *moves.last().unwrap();
    for depth in 1..=3 {
        let mut ab = AlphaBetaSearcher::new(SearchParams::default(), flat, SmallRng::seed_from_u64(0));
        assert_eq!(ab.search_depth(&b, depth, &open_budget).unwrap().best_move, last, "depth {depth}");
    }
    let params = SearchParams { max_depth: Some(3), ..SearchParams::default() };
    let mut ab = AlphaBetaSearcher::new(params, flat, SmallRng::seed_from_u64(0));
    assert_eq!(ab.get_move(&b, &open_budget), last);
}

#[test]
fn tie_break_divergence_is_observable() {
    let b = position();
    let mut mm = MinimaxSearcher::new(SearchParams { depth: 2, ..SearchParams::default() }, flat, SmallRng::seed_from_u64(0));
    let mut ab = AlphaBetaSearcher::new(SearchParams { max_depth: Some(2), ..SearchParams::default() }, flat, SmallRng::seed_from_u64(0));
    let m1 = mm.search(&b, &open_budget);
    let m2 = ab.search(&b, &open_budget);
    assert_eq!(m1.score, m2.score);
    assert_ne!(m1.best_move, m2.best_move);
}
