use holdem_round::agents::{AgentTable, CallingAgent};
use holdem_round::betting::Action;
use holdem_round::config::TableConfig;
use holdem_round::events::{EventKind, TableEvent};
use holdem_round::player::PlayerId;
use holdem_round::round::{Phase, RoundController};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn callers(n: usize) -> AgentTable {
    (0..n).fold(AgentTable::new(), |t, i| t.with_agent(PlayerId(i), CallingAgent))
}

fn first_actor_per_phase(events: &[TableEvent]) -> Vec<(Phase, PlayerId)> {
    let mut out: Vec<(Phase, PlayerId)> = Vec::new();
    for e in events {
        if let EventKind::PlayerActed { player, .. } = e.kind {
            if out.last().map(|(ph, _)| *ph) != Some(e.snapshot.phase) {
                out.push((e.snapshot.phase, player));
            }
        }
    }
    out
}

#[test]
fn heads_up_dealer_posts_small_blind_and_acts_first_preflop() {
    let mut c = RoundController::new(TableConfig::default().with_player_count(2)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut events = Vec::new();
    c.play_hand(&mut rng, &mut callers(2), &mut events).unwrap();

    assert_eq!(
        events[0].kind,
        EventKind::HandStarted { dealer: PlayerId(0), small_blind: PlayerId(0), big_blind: PlayerId(1) }
    );
    assert_eq!(
        first_actor_per_phase(&events),
        vec![
            (Phase::PreFlop, PlayerId(0)),
            (Phase::Flop, PlayerId(1)),
            (Phase::Turn, PlayerId(1)),
            (Phase::River, PlayerId(1)),
        ]
    );
}

#[test]
fn button_moves_one_seat_per_hand() {
    let mut c = RoundController::new(TableConfig::default().with_player_count(5)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let mut agents = callers(5);
    let mut dealers = Vec::new();
    for _ in 0..6 {
        let mut events = Vec::new();
        c.play_hand(&mut rng, &mut agents, &mut events).unwrap();
        if let EventKind::HandStarted { dealer, small_blind, big_blind } = events[0].kind {
            assert_eq!(small_blind.0, (dealer.0 + 1) % 5);
            assert_eq!(big_blind.0, (dealer.0 + 2) % 5);
            dealers.push(dealer.0);
        }
    }
    assert_eq!(dealers, vec![0, 1, 2, 3, 4, 0]);
    assert_eq!(c.hands_played(), 6);
}

#[test]
fn preflop_opens_left_of_big_blind() {
    let mut c = RoundController::new(TableConfig::default().with_player_count(4)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut events = Vec::new();
    c.play_hand(&mut rng, &mut callers(4), &mut events).unwrap();
    let order: Vec<PlayerId> = events
        .iter()
        .filter(|e| e.snapshot.phase == Phase::PreFlop)
        .filter_map(|e| match e.kind {
            EventKind::PlayerActed { player, .. } => Some(player),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec![PlayerId(3), PlayerId(0), PlayerId(1), PlayerId(2)]);
    let last = events
        .iter()
        .rev()
        .find_map(|e| match e.kind {
            EventKind::PlayerActed { action, .. } if e.snapshot.phase == Phase::PreFlop => Some(action),
            _ => None,
        });
    // the big blind closes the action with a check
    assert_eq!(last, Some(Action::Check));
}
