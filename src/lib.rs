//! holdem-round: one hand of Texas Hold'em, from shuffle to pot award.
//!
//! Goals:
//! - Exhaustive best-of-seven hand evaluation with explicit tie-breaks
//! - A betting phase driven by pluggable action sources
//! - No panics for invalid input; use `Result` for recoverable errors
//! - Reproducible hands: randomness is always injected
//!
//! ## Evaluate a hand
//! ```
//! use holdem_round::cards::parse_cards;
//! use holdem_round::evaluator::{best_hand, HandRank};
//!
//! let seven = parse_cards("Ah Kh Qh Jh Th 2c 2d").unwrap();
//! assert_eq!(best_hand(&seven).unwrap().rank, HandRank::RoyalFlush);
//! ```
//!
//! ## Play a hand
//! ```
//! use holdem_round::agents::{AgentTable, CallingAgent};
//! use holdem_round::config::TableConfig;
//! use holdem_round::player::PlayerId;
//! use holdem_round::round::RoundController;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut table = RoundController::new(TableConfig::default()).unwrap();
//! let mut agents = (0..3).fold(AgentTable::new(), |t, i| t.with_agent(PlayerId(i), CallingAgent));
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let outcome = table.play_hand(&mut rng, &mut agents, &mut ()).unwrap();
//! assert_eq!(outcome.amount, 30);
//! ```

pub mod agents;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod evaluator;
pub mod events;
pub mod hand;
pub mod player;
pub mod round;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
