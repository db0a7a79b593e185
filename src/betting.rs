//! One betting phase: turn order, legality, chip movement and the pending
//! set that decides when everyone has had their say.

use crate::agents::AgentTable;
use crate::cards::Card;
use crate::events::{EventKind, TableEvent, TableObserver};
use crate::hand::HoleCards;
use crate::player::PlayerId;
use crate::round::{Phase, RoundState};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// A player's decision.
///
/// `Call` carries the chips added to match the table bet; `Raise` carries
/// the new absolute table bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Check,
    Call(u64),
    Raise(u64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("Fold"),
            Action::Check => f.write_str("Check"),
            Action::Call(n) => write!(f, "Call {n}"),
            Action::Raise(n) => write!(f, "Raise to {n}"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("no player seated at seat {0}")]
    SeatNotFound(usize),
    #[error("player {0} has already folded")]
    AlreadyFolded(PlayerId),
    #[error("player {0} is all-in and cannot act")]
    PlayerAllIn(PlayerId),
    #[error("cannot check while facing a bet of {to_call}")]
    CheckFacingBet { to_call: u64 },
    #[error("call must be {expected}, got {got}")]
    CallAmountMismatch { expected: u64, got: u64 },
    #[error("action needs {needed} chips, player has {available}")]
    InsufficientChips { needed: u64, available: u64 },
    #[error("raise target {target} must exceed current bet {current}")]
    RaiseNotAboveCurrent { current: u64, target: u64 },
    #[error("betting phase is already complete")]
    PhaseComplete,
    #[error("no action source seated for player {0}")]
    NoActionSource(PlayerId),
}

/// Everything a decision maker may look at when it is their turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub player: PlayerId,
    pub chips: u64,
    pub bet: u64,
    pub hole: Option<HoleCards>,
    pub pot: u64,
    pub current_bet: u64,
    pub community: &'a [Card],
    pub phase: Phase,
}

impl<'a> TurnContext<'a> {
    pub fn for_seat(state: &'a RoundState, seat: usize) -> Option<Self> {
        let p = state.players().get(seat)?;
        Some(Self {
            player: p.id(),
            chips: p.chips(),
            bet: p.bet(),
            hole: p.hole(),
            pot: state.pot(),
            current_bet: state.current_bet(),
            community: state.board().as_slice(),
            phase: state.phase(),
        })
    }

    pub fn to_call(&self) -> u64 {
        self.current_bet.saturating_sub(self.bet)
    }

    /// The call this player would make: the full amount owed, or the whole
    /// stack when it cannot cover it.
    pub fn call_amount(&self) -> u64 {
        self.to_call().min(self.chips)
    }

    /// Highest raise target the stack allows.
    pub fn max_raise_target(&self) -> u64 {
        self.bet + self.chips
    }

    pub fn is_legal(&self, action: Action) -> bool {
        match action {
            Action::Fold => true,
            Action::Check => self.to_call() == 0,
            Action::Call(n) => n == self.call_amount(),
            Action::Raise(target) => {
                target > self.current_bet && target <= self.max_raise_target()
            }
        }
    }

    /// Replace an illegal decision with the safe default: fold when facing a
    /// bet, check otherwise.
    pub fn normalize(&self, action: Action) -> Action {
        if self.is_legal(action) {
            action
        } else {
            self.safe_default()
        }
    }

    pub fn safe_default(&self) -> Action {
        if self.to_call() > 0 {
            Action::Fold
        } else {
            Action::Check
        }
    }
}

/// Something that answers "what do you do?" for a seat: a human frontend,
/// a bot, or a test script.
pub trait ActionSource {
    fn decide(&mut self, ctx: &TurnContext<'_>) -> Action;
}

impl<F> ActionSource for F
where
    F: FnMut(&TurnContext<'_>) -> Action,
{
    fn decide(&mut self, ctx: &TurnContext<'_>) -> Action {
        self(ctx)
    }
}

/// Validate `action` for the player at `seat` and apply it. Nothing is
/// mutated unless the action is legal.
pub fn apply_action(state: &mut RoundState, seat: usize, action: Action) -> Result<(), ActionError> {
    let current_bet = state.current_bet;
    let p = state.players.get(seat).ok_or(ActionError::SeatNotFound(seat))?;
    let id = p.id();
    if p.is_folded() {
        return Err(ActionError::AlreadyFolded(id));
    }
    if p.is_all_in() {
        return Err(ActionError::PlayerAllIn(id));
    }
    let to_call = current_bet.saturating_sub(p.bet());

    let paid = match action {
        Action::Fold => None,
        Action::Check => {
            if to_call > 0 {
                return Err(ActionError::CheckFacingBet { to_call });
            }
            None
        }
        Action::Call(amount) => {
            if amount > p.chips() {
                return Err(ActionError::InsufficientChips { needed: amount, available: p.chips() });
            }
            let expected = to_call.min(p.chips());
            if amount != expected {
                return Err(ActionError::CallAmountMismatch { expected, got: amount });
            }
            Some(amount)
        }
        Action::Raise(target) => {
            if target <= current_bet {
                return Err(ActionError::RaiseNotAboveCurrent { current: current_bet, target });
            }
            let delta = target - p.bet();
            if delta > p.chips() {
                return Err(ActionError::InsufficientChips { needed: delta, available: p.chips() });
            }
            Some(delta)
        }
    };

    match (action, paid) {
        (Action::Fold, _) => state.players[seat].folded = true,
        (_, Some(amount)) => {
            state.players[seat].commit(amount);
            state.pot += amount;
        }
        _ => {}
    }
    if let Action::Raise(target) = action {
        state.current_bet = target;
    }
    debug!(player = %id, %action, pot = state.pot, current_bet = state.current_bet, "action applied");
    Ok(())
}

/// How a betting phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub actions: usize,
    /// Table bet at the moment the phase closed, before the reset.
    pub final_bet: u64,
    /// Only one player was left in the hand.
    pub folded_out: bool,
}

/// Turn order and the pending-action set for one betting phase.
#[derive(Debug, Clone)]
pub struct BettingRound {
    phase: Phase,
    pending: BTreeSet<PlayerId>,
    cursor: usize,
    actions: usize,
}

impl BettingRound {
    /// Pre-flop action opens left of the big blind; every later phase opens
    /// left of the small blind. Everyone who can still act owes a decision.
    pub fn start(state: &RoundState) -> Self {
        let n = state.players().len().max(1);
        let anchor = match state.phase() {
            Phase::PreFlop => state.big_blind_seat(),
            _ => state.small_blind_seat(),
        };
        let pending = state.players().iter().filter(|p| p.can_act()).map(|p| p.id()).collect();
        Self { phase: state.phase(), pending, cursor: (anchor + 1) % n, actions: 0 }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> &BTreeSet<PlayerId> {
        &self.pending
    }

    pub fn is_complete(&self, state: &RoundState) -> bool {
        self.pending.is_empty() || state.players_in_hand() < 2
    }

    /// Seat of the next player to act, skipping anyone folded, all-in or no
    /// longer pending.
    pub fn next_actor(&self, state: &RoundState) -> Option<usize> {
        if self.is_complete(state) {
            return None;
        }
        let n = state.players().len();
        (0..n)
            .map(|k| (self.cursor + k) % n)
            .find(|&seat| {
                let p = &state.players()[seat];
                p.can_act() && self.pending.contains(&p.id())
            })
    }

    /// Apply `action` for the next actor and update the pending set.
    pub fn act(&mut self, state: &mut RoundState, action: Action) -> Result<PlayerId, ActionError> {
        let seat = self.next_actor(state).ok_or(ActionError::PhaseComplete)?;
        apply_action(state, seat, action)?;
        let id = state.players()[seat].id();
        self.pending.remove(&id);
        if let Action::Raise(_) = action {
            // a raise reopens action for everyone else still able to act
            self.pending.extend(
                state.players().iter().filter(|p| p.id() != id && p.can_act()).map(|p| p.id()),
            );
        }
        self.cursor = (seat + 1) % state.players().len();
        self.actions += 1;
        Ok(id)
    }

    /// Close the phase. A normal close clears per-phase bets and the table
    /// bet; a fold-out leaves them for the pot resolution to see.
    pub fn finish(self, state: &mut RoundState) -> PhaseSummary {
        let folded_out = state.players_in_hand() < 2;
        let final_bet = state.current_bet;
        if !folded_out {
            state.clear_bets();
        }
        PhaseSummary { phase: self.phase, actions: self.actions, final_bet, folded_out }
    }

    /// Drive the phase to completion, asking each actor's source in turn.
    pub fn run(
        mut self,
        state: &mut RoundState,
        agents: &mut AgentTable,
        observer: &mut dyn TableObserver,
    ) -> Result<PhaseSummary, ActionError> {
        while let Some(seat) = self.next_actor(state) {
            let action = {
                let ctx = TurnContext::for_seat(state, seat)
                    .ok_or(ActionError::SeatNotFound(seat))?;
                agents.decide(&ctx)?
            };
            let id = self.act(state, action)?;
            observer.on_event(&TableEvent::new(EventKind::PlayerActed { player: id, action }, state));
        }
        Ok(self.finish(state))
    }
}
