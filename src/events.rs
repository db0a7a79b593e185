//! Presentation boundary. The round emits [`TableEvent`]s carrying a public
//! [`TableSnapshot`]; observers render or record them and never feed
//! anything back into the hand.

use crate::betting::Action;
use crate::cards::Card;
use crate::evaluator::BestHand;
use crate::player::{Player, PlayerId};
use crate::round::{Phase, RoundState};

/// What everyone at the table can see about one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub chips: u64,
    pub bet: u64,
    pub folded: bool,
    pub all_in: bool,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id(),
            name: p.name().to_string(),
            chips: p.chips(),
            bet: p.bet(),
            folded: p.is_folded(),
            all_in: p.is_all_in(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub phase: Phase,
    pub community: Vec<Card>,
    pub pot: u64,
    pub current_bet: u64,
    pub players: Vec<PlayerView>,
}

impl TableSnapshot {
    pub fn of(state: &RoundState) -> Self {
        Self {
            phase: state.phase(),
            community: state.board().as_slice().to_vec(),
            pot: state.pot(),
            current_bet: state.current_bet(),
            players: state.players().iter().map(PlayerView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EventKind {
    HandStarted { dealer: PlayerId, small_blind: PlayerId, big_blind: PlayerId },
    BlindsPosted { small: u64, big: u64 },
    CommunityDealt { cards: Vec<Card> },
    PlayerActed { player: PlayerId, action: Action },
    Showdown { hands: Vec<(PlayerId, BestHand)> },
    PotAwarded { winner: PlayerId, amount: u64, showdown: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEvent {
    pub kind: EventKind,
    pub snapshot: TableSnapshot,
}

impl TableEvent {
    pub(crate) fn new(kind: EventKind, state: &RoundState) -> Self {
        Self { kind, snapshot: TableSnapshot::of(state) }
    }
}

pub trait TableObserver {
    fn on_event(&mut self, event: &TableEvent);
}

/// Discards everything.
impl TableObserver for () {
    fn on_event(&mut self, _event: &TableEvent) {}
}

/// Records every event in order.
impl TableObserver for Vec<TableEvent> {
    fn on_event(&mut self, event: &TableEvent) {
        self.push(event.clone());
    }
}
