//! Agents: pluggable decision makers for seats.
//!
//! [`AgentTable`] maps player ids to an [`ActionSource`]. Besides closures,
//! three sources ship here: a scripted queue for tests and replays, a
//! check-or-call agent, and a seeded random agent that only returns legal
//! actions.

use crate::betting::{Action, ActionError, ActionSource, TurnContext};
use crate::player::PlayerId;
use core::fmt;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::collections::{BTreeMap, VecDeque};

/// One action source per seated player.
#[derive(Default)]
pub struct AgentTable {
    seats: BTreeMap<PlayerId, Box<dyn ActionSource>>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentTable").field("seats", &self.seats.keys().collect::<Vec<_>>()).finish()
    }
}

impl AgentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat `agent` for `player`, replacing any previous one.
    pub fn set_agent(&mut self, player: PlayerId, agent: Box<dyn ActionSource>) {
        self.seats.insert(player, agent);
    }

    /// Builder form of [`AgentTable::set_agent`].
    pub fn with_agent(mut self, player: PlayerId, agent: impl ActionSource + 'static) -> Self {
        self.set_agent(player, Box::new(agent));
        self
    }

    pub fn remove(&mut self, player: PlayerId) -> Option<Box<dyn ActionSource>> {
        self.seats.remove(&player)
    }

    pub fn has_agent(&self, player: PlayerId) -> bool {
        self.seats.contains_key(&player)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Ask the agent seated for `ctx.player`.
    pub fn decide(&mut self, ctx: &TurnContext<'_>) -> Result<Action, ActionError> {
        let agent = self.seats.get_mut(&ctx.player).ok_or(ActionError::NoActionSource(ctx.player))?;
        Ok(agent.decide(ctx))
    }
}

/// Plays a fixed list of actions in order, then the safe default.
/// Actions are passed through untouched so illegal ones surface as errors.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    script: VecDeque<Action>,
}

impl ScriptedAgent {
    pub fn new<I: IntoIterator<Item = Action>>(actions: I) -> Self {
        Self { script: actions.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ActionSource for ScriptedAgent {
    fn decide(&mut self, ctx: &TurnContext<'_>) -> Action {
        self.script.pop_front().unwrap_or_else(|| ctx.safe_default())
    }
}

/// Checks when it can, otherwise calls whatever it owes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallingAgent;

impl ActionSource for CallingAgent {
    fn decide(&mut self, ctx: &TurnContext<'_>) -> Action {
        if ctx.to_call() == 0 {
            Action::Check
        } else {
            Action::Call(ctx.call_amount())
        }
    }
}

/// Weights for [`RandomAgent`]'s choices, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomProfile {
    pub fold_pct: u32,
    pub raise_pct: u32,
}

impl Default for RandomProfile {
    fn default() -> Self {
        Self { fold_pct: 15, raise_pct: 20 }
    }
}

/// Picks a random legal action. With a seed its decisions are reproducible.
#[derive(Debug)]
pub struct RandomAgent {
    profile: RandomProfile,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(profile: RandomProfile, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(v) => StdRng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                StdRng::from_seed(seed)
            }
        };
        Self { profile, rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomProfile::default(), Some(seed))
    }
}

impl ActionSource for RandomAgent {
    fn decide(&mut self, ctx: &TurnContext<'_>) -> Action {
        let roll = self.rng.random_range(0..100u32);
        let can_raise = ctx.max_raise_target() > ctx.current_bet;
        let action = if ctx.to_call() > 0 && roll < self.profile.fold_pct {
            Action::Fold
        } else if can_raise && roll >= 100 - self.profile.raise_pct {
            let lo = ctx.current_bet + 1;
            let hi = ctx.max_raise_target();
            // prefer roughly doubling the bet, capped at the stack
            let target = (ctx.current_bet.max(1) * 2).clamp(lo, hi);
            Action::Raise(self.rng.random_range(target..=hi.min(target * 2)))
        } else if ctx.to_call() == 0 {
            Action::Check
        } else {
            Action::Call(ctx.call_amount())
        };
        ctx.normalize(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::round::Phase;

    fn ctx(chips: u64, bet: u64, current_bet: u64) -> TurnContext<'static> {
        const EMPTY: &[Card] = &[];
        TurnContext {
            player: PlayerId(0),
            chips,
            bet,
            hole: None,
            pot: 30,
            current_bet,
            community: EMPTY,
            phase: Phase::Flop,
        }
    }

    #[test]
    fn scripted_agent_replays_then_defaults() {
        let mut a = ScriptedAgent::new([Action::Raise(40)]);
        assert_eq!(a.decide(&ctx(100, 0, 20)), Action::Raise(40));
        assert_eq!(a.remaining(), 0);
        assert_eq!(a.decide(&ctx(100, 0, 20)), Action::Fold);
        assert_eq!(a.decide(&ctx(100, 20, 20)), Action::Check);
    }

    #[test]
    fn calling_agent_covers_short_stacks() {
        let mut a = CallingAgent;
        assert_eq!(a.decide(&ctx(100, 0, 0)), Action::Check);
        assert_eq!(a.decide(&ctx(100, 10, 30)), Action::Call(20));
        assert_eq!(a.decide(&ctx(5, 10, 30)), Action::Call(5));
    }

    #[test]
    fn random_agent_is_always_legal_and_reproducible() {
        let mut a = RandomAgent::seeded(11);
        let mut b = RandomAgent::seeded(11);
        for (chips, bet, cur) in [(100, 0, 0), (100, 0, 20), (5, 0, 20), (0, 0, 0), (300, 40, 80)] {
            let c = ctx(chips, bet, cur);
            let x = a.decide(&c);
            assert!(c.is_legal(x), "{x:?} illegal for {c:?}");
            assert_eq!(x, b.decide(&c));
        }
    }

    #[test]
    fn agent_table_reports_missing_seat() {
        let mut table = AgentTable::new().with_agent(PlayerId(1), CallingAgent);
        assert!(table.has_agent(PlayerId(1)));
        assert_eq!(table.decide(&ctx(10, 0, 0)), Err(ActionError::NoActionSource(PlayerId(0))));
    }
}
