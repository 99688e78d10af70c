use anyhow::{Context, Result};
use clap::Parser;
use isolation_agent::selfplay::{run_matches, summarize, AgentKind, AgentSpec, MatchParams};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "isolation-match", version, about = "Pit two Isolation agents against each other", long_about = None)]
struct Args {
    /// Policy for the first agent
    #[arg(long, value_enum, default_value_t = AgentKind::AlphaBeta)]
    first: AgentKind,

    /// Policy for the second agent
    #[arg(long, value_enum, default_value_t = AgentKind::Minimax)]
    second: AgentKind,

    /// JSON agent spec for the first agent (overrides --first)
    #[arg(long)]
    first_config: Option<PathBuf>,

    /// JSON agent spec for the second agent (overrides --second)
    #[arg(long)]
    second_config: Option<PathBuf>,

    #[arg(long, default_value_t = 20)]
    games: usize,

    /// Per-turn time limit in milliseconds
    #[arg(long, default_value_t = 150)]
    time_limit_ms: u64,

    #[arg(long, default_value_t = 7)]
    width: usize,

    #[arg(long, default_value_t = 7)]
    height: usize,

    #[arg(long, default_value_t = 1)]
    threads: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Start from an empty board instead of random placements
    #[arg(long)]
    no_random_openings: bool,

    /// Print every game record as a JSON line
    #[arg(long)]
    json: bool,
}

fn load_spec(path: Option<&Path>, kind: AgentKind) -> Result<AgentSpec> {
    let Some(path) = path else { return Ok(AgentSpec::new(kind)); };
    let text = fs::read_to_string(path).with_context(|| format!("read agent spec: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse agent spec: {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let first = load_spec(args.first_config.as_deref(), args.first)?;
    let second = load_spec(args.second_config.as_deref(), args.second)?;
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("board dimensions must be positive");
    }
    let params = MatchParams {
        games: args.games,
        width: args.width,
        height: args.height,
        time_limit_ms: args.time_limit_ms,
        threads: args.threads,
        seed: args.seed,
        random_openings: !args.no_random_openings,
    };

    let t0 = Instant::now();
    let records = run_matches(&first, &second, &params)?;
    let elapsed = t0.elapsed();

    if args.json {
        for r in &records { println!("{}", serde_json::to_string(r)?); }
    }
    let s = summarize(&records);
    println!("{:?} vs {:?}: {} games in {:.2}s", first.kind, second.kind, s.games, elapsed.as_secs_f32());
    println!("  first  wins: {}", s.first_wins);
    println!("  second wins: {}", s.second_wins);
    println!("  timeouts: {}, illegal moves: {}", s.timeouts, s.illegal_moves);
    Ok(())
}
