use holdem_round::agents::{AgentTable, RandomAgent, RandomProfile};
use holdem_round::betting::Action;
use holdem_round::config::TableConfig;
use holdem_round::events::{EventKind, TableEvent};
use holdem_round::player::PlayerId;
use holdem_round::round::RoundController;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

fn random_table(n: usize, seed: u64, profile: RandomProfile) -> AgentTable {
    (0..n).fold(AgentTable::new(), |t, i| {
        t.with_agent(PlayerId(i), RandomAgent::new(profile, Some(seed ^ (i as u64 + 1))))
    })
}

/// Play up to `hands` hands, recording every event. Busted players leave
/// between hands.
fn play(n: usize, seed: u64, hands: usize, profile: RandomProfile) -> (RoundController, Vec<Vec<TableEvent>>) {
    let config = TableConfig::default().with_player_count(n).with_starting_chips(200);
    let mut table = RoundController::new(config).unwrap();
    let mut agents = random_table(n, seed, profile);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut log = Vec::new();
    for _ in 0..hands {
        if table.players().len() < 2 {
            break;
        }
        let mut events = Vec::new();
        table.play_hand(&mut rng, &mut agents, &mut events).unwrap();
        log.push(events);
        for p in table.remove_busted() {
            agents.remove(p.id());
        }
    }
    (table, log)
}

fn aggressive() -> RandomProfile {
    RandomProfile { fold_pct: 10, raise_pct: 40 }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chips_are_conserved(n in 2usize..=6, seed in any::<u64>()) {
        let (table, log) = play(n, seed, 6, RandomProfile::default());
        let total = 200 * n as u64;
        for events in &log {
            for e in events {
                let stacks: u64 = e.snapshot.players.iter().map(|p| p.chips).sum();
                // busted players only ever leave with an empty stack
                prop_assert_eq!(stacks + e.snapshot.pot, total);
            }
        }
        let left: u64 = table.players().iter().map(|p| p.chips()).sum();
        prop_assert_eq!(left, total);
        prop_assert_eq!(table.state().pot(), 0);
    }

    #[test]
    fn a_raise_reopens_action_for_everyone_else(n in 2usize..=6, seed in any::<u64>()) {
        let (_, log) = play(n, seed, 4, aggressive());
        for events in &log {
            let mut owed: BTreeSet<PlayerId> = BTreeSet::new();
            for e in events {
                match &e.kind {
                    EventKind::PlayerActed { player, action } => {
                        owed.remove(player);
                        if let Action::Raise(_) = action {
                            owed.extend(
                                e.snapshot
                                    .players
                                    .iter()
                                    .filter(|p| p.id != *player && !p.folded && !p.all_in)
                                    .map(|p| p.id),
                            );
                        }
                    }
                    EventKind::CommunityDealt { .. }
                    | EventKind::Showdown { .. }
                    | EventKind::PotAwarded { .. } => {
                        prop_assert!(owed.is_empty(), "{:?} never answered a raise", owed);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn bets_are_matched_and_cleared_between_phases(n in 2usize..=6, seed in any::<u64>()) {
        let (_, log) = play(n, seed, 4, aggressive());
        for events in &log {
            for e in events {
                if let EventKind::CommunityDealt { .. } = e.kind {
                    prop_assert_eq!(e.snapshot.current_bet, 0);
                    prop_assert!(e.snapshot.players.iter().all(|p| p.bet == 0));
                }
            }
        }
    }

    #[test]
    fn every_hand_ends_with_one_award(n in 2usize..=6, seed in any::<u64>()) {
        let (_, log) = play(n, seed, 4, RandomProfile::default());
        for events in &log {
            let awards = events.iter().filter(|e| matches!(e.kind, EventKind::PotAwarded { .. })).count();
            prop_assert_eq!(awards, 1);
            prop_assert!(matches!(events.last().map(|e| &e.kind), Some(EventKind::PotAwarded { .. })), "last event must be PotAwarded");
            let acted = events.iter().filter(|e| matches!(e.kind, EventKind::PlayerActed { .. })).count();
            // every raise lifts the table bet by at least one chip
            prop_assert!(acted < 4 * n * 200);
        }
    }
}

#[test]
fn same_seed_replays_the_same_hands() {
    let (a, log_a) = play(4, 77, 5, RandomProfile::default());
    let (b, log_b) = play(4, 77, 5, RandomProfile::default());
    assert_eq!(log_a, log_b);
    let chips = |t: &RoundController| t.players().iter().map(|p| p.chips()).collect::<Vec<_>>();
    assert_eq!(chips(&a), chips(&b));
}
