use isolation_agent::board::isolation::{Board, Player};
use isolation_agent::board::GameState;
use isolation_agent::search::eval::{Evaluator, Heuristic};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const ALL: [Heuristic; 3] = [Heuristic::MobilityCentrality, Heuristic::MobilityRatio, Heuristic::PhaseAdaptive];

fn playout(seed: u64, plies: usize) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut b = Board::default();
    for _ in 0..plies {
        let moves = b.active_moves();
        match moves.choose(&mut rng) {
            Some(&m) => b = b.forecast(m),
            None => break,
        }
    }
    b
}

#[test]
fn boxed_in_player_scores_negative_infinity() {
    let b = Board::new(3, 3)
        .place(Player::One, (0, 0))
        .place(Player::Two, (2, 2))
        .block((1, 2))
        .block((2, 1));
    for h in ALL {
        assert_eq!(h.score(&b, Player::One), f64::NEG_INFINITY, "{h:?}");
        assert_eq!(h.score(&b, Player::Two), f64::INFINITY, "{h:?}");
    }
}

#[test]
fn finished_playouts_score_infinite() {
    for seed in 0..40u64 {
        let b = playout(seed, 49);
        assert!(b.active_moves().is_empty(), "seed {seed} did not finish");
        let loser = b.active_player();
        for h in ALL {
            assert_eq!(h.score(&b, loser), f64::NEG_INFINITY, "{h:?} seed {seed}");
            assert_eq!(h.score(&b, loser.other()), f64::INFINITY, "{h:?} seed {seed}");
        }
    }
}

#[test]
fn undecided_states_score_finite() {
    for seed in 0..200u64 {
        let b = playout(seed, (seed % 30) as usize);
        if b.active_moves().is_empty() { continue; }
        for h in ALL {
            for p in [Player::One, Player::Two] {
                let v = h.score(&b, p);
                assert!(v.is_finite(), "{h:?} gave {v} for {p:?} at seed {seed}\n{b}");
            }
        }
    }
}

#[test]
fn heuristic_names_round_trip_through_json() {
    let names: Vec<String> = ALL.iter().map(|h| serde_json::to_string(h).unwrap()).collect();
    assert_eq!(names, vec!["\"mobility_centrality\"", "\"mobility_ratio\"", "\"phase_adaptive\""]);
}
