use clap::Parser;
use holdem_round::agents::{AgentTable, RandomAgent};
use holdem_round::config::TableConfig;
use holdem_round::events::{EventKind, TableEvent, TableObserver};
use holdem_round::round::RoundController;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Play seeded hands between random agents and log what happens.
#[derive(Debug, Parser)]
#[command(name = "holdem", version)]
struct Args {
    /// Number of seats (2-8)
    #[arg(short, long, default_value_t = 3)]
    players: usize,
    /// Starting chips per player
    #[arg(short, long, default_value_t = 1000)]
    chips: u64,
    #[arg(long, default_value_t = 5)]
    small_blind: u64,
    #[arg(long, default_value_t = 10)]
    big_blind: u64,
    /// Hands to play; stops early when one player has every chip
    #[arg(long, default_value_t = 10)]
    hands: u64,
    /// Seed for shuffling and agent decisions
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

/// Logs the presentation events as they arrive.
struct LogObserver;

impl TableObserver for LogObserver {
    fn on_event(&mut self, event: &TableEvent) {
        let snap = &event.snapshot;
        match &event.kind {
            EventKind::CommunityDealt { .. } => {
                let board: Vec<String> = snap.community.iter().map(|c| c.pretty()).collect();
                tracing::info!("{}: {} (pot {})", snap.phase, board.join(" "), snap.pot);
            }
            EventKind::PlayerActed { player, action } => {
                tracing::info!("{player} {action}");
            }
            EventKind::Showdown { hands } => {
                for (id, hand) in hands {
                    tracing::info!("{id} shows {hand}");
                }
            }
            EventKind::PotAwarded { winner, amount, .. } => {
                let stacks: Vec<String> =
                    snap.players.iter().map(|p| format!("{}={}", p.name, p.chips)).collect();
                tracing::info!("{winner} wins {amount}; stacks {}", stacks.join(", "));
            }
            _ => {}
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = TableConfig::default()
        .with_player_count(args.players)
        .with_starting_chips(args.chips)
        .with_blinds(args.small_blind, args.big_blind);
    let mut table = RoundController::new(config)?;
    let mut agents = table.players().iter().fold(AgentTable::new(), |t, p| {
        let seed = args.seed.wrapping_add(p.id().0 as u64 + 1);
        t.with_agent(p.id(), RandomAgent::seeded(seed))
    });
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for _ in 0..args.hands {
        if table.players().len() < 2 {
            break;
        }
        table.play_hand(&mut rng, &mut agents, &mut LogObserver)?;
        for p in table.remove_busted() {
            agents.remove(p.id());
        }
    }
    tracing::info!("played {} hands, holdem-round {}", table.hands_played(), holdem_round::VERSION);
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
