//! Round controller: sequences one hand from setup to pot award.

use crate::agents::AgentTable;
use crate::betting::{ActionError, BettingRound, PhaseSummary};
use crate::cards::Card;
use crate::config::{ConfigError, TableConfig};
use crate::deck::{Deck, DeckError};
use crate::evaluator::{best_hand, showdown_winner, BestHand, EvalError};
use crate::events::{EventKind, TableEvent, TableObserver};
use crate::hand::{Board, HandError, HoleCards};
use crate::player::{Player, PlayerId};
use rand::Rng;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Setup,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Setup => "Setup",
            Phase::PreFlop => "Pre-flop",
            Phase::Flop => "Flop",
            Phase::Turn => "Turn",
            Phase::River => "River",
            Phase::Showdown => "Showdown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("need at least two players with chips, have {0}")]
    NotEnoughPlayers(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Everything that changes during a hand. Owned by [`RoundController`];
/// betting and evaluation only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub(crate) phase: Phase,
    pub(crate) players: Vec<Player>,
    pub(crate) board: Board,
    pub(crate) deck: Deck,
    pub(crate) pot: u64,
    pub(crate) current_bet: u64,
    pub(crate) dealer_seat: usize,
    pub(crate) small_blind_seat: usize,
    pub(crate) big_blind_seat: usize,
}

impl RoundState {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            phase: Phase::Setup,
            players,
            board: Board::default(),
            deck: Deck::standard(),
            pot: 0,
            current_bet: 0,
            dealer_seat: 0,
            small_blind_seat: 0,
            big_blind_seat: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn dealer_seat(&self) -> usize {
        self.dealer_seat
    }

    pub fn small_blind_seat(&self) -> usize {
        self.small_blind_seat
    }

    pub fn big_blind_seat(&self) -> usize {
        self.big_blind_seat
    }

    /// Players who have not folded.
    pub fn players_in_hand(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }

    /// Players who can still make decisions.
    pub fn players_able_to_act(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    pub(crate) fn clear_bets(&mut self) {
        for p in &mut self.players {
            p.bet = 0;
        }
        self.current_bet = 0;
    }

    /// Next seat after `seat` still in the hand (wrapping); `seat` itself if
    /// nobody else is.
    fn next_in_hand(&self, seat: usize) -> usize {
        let n = self.players.len();
        (1..=n).map(|k| (seat + k) % n).find(|&i| self.players[i].in_hand()).unwrap_or(seat)
    }

    /// Seats in clockwise order starting at `from`.
    fn seats_from(&self, from: usize) -> impl Iterator<Item = usize> {
        let n = self.players.len();
        (0..n).map(move |k| (from + k) % n)
    }

    fn deal(&mut self, count: usize) -> Result<Vec<Card>, DeckError> {
        let (cards, rest) = self.deck.deal(count)?;
        self.deck = rest;
        Ok(cards)
    }
}

/// Result of a finished hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOutcome {
    pub winner: PlayerId,
    pub amount: u64,
    /// False when everyone else folded and no cards were compared.
    pub showdown: bool,
    /// Revealed hands in showdown order; empty without a showdown.
    pub hands: Vec<(PlayerId, BestHand)>,
    pub board: Vec<Card>,
    pub phases: Vec<PhaseSummary>,
}

/// Drives hands at one table. Owns the round state exclusively; the only
/// outside calls during a hand go to the agents and the observer.
#[derive(Debug)]
pub struct RoundController {
    config: TableConfig,
    state: RoundState,
    button: Option<usize>,
    hands_played: u64,
}

impl RoundController {
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = RoundState::new(config.players());
        Ok(Self { config, state, button: None, hands_played: 0 })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn players(&self) -> &[Player] {
        self.state.players()
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Drop players with no chips left, keeping the button on the same
    /// player (or the next one) so rotation continues from there.
    pub fn remove_busted(&mut self) -> Vec<Player> {
        let button_id = self.button.and_then(|b| self.state.players.get(b)).map(|p| p.id());
        let (busted, kept): (Vec<Player>, Vec<Player>) =
            std::mem::take(&mut self.state.players).into_iter().partition(|p| p.chips() == 0);
        self.state.players = kept;
        if let Some(id) = button_id {
            // seats before the old button shift left; a busted button hands it back one seat
            let before = self.state.players.iter().take_while(|p| p.id() < id).count();
            let still_seated = self.state.players.iter().any(|p| p.id() == id);
            self.button = match (still_seated, before) {
                (true, b) => Some(b),
                (false, 0) => self.state.players.len().checked_sub(1),
                (false, b) => Some(b - 1),
            };
        }
        for p in &busted {
            info!(player = %p.id(), name = p.name(), "player busted");
        }
        busted
    }

    /// Play one complete hand.
    ///
    /// If the hand fails partway (an illegal action, a missing agent), every
    /// chip committed so far goes back to the player who put it in and the
    /// error is returned; stacks are as they were before the hand.
    pub fn play_hand<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        agents: &mut AgentTable,
        observer: &mut dyn TableObserver,
    ) -> Result<HandOutcome, RoundError> {
        self.start_hand(rng)?;
        let outcome = self.run_hand(agents, observer);
        if let Err(err) = &outcome {
            self.abort_hand(err);
        }
        outcome
    }

    fn run_hand(
        &mut self,
        agents: &mut AgentTable,
        observer: &mut dyn TableObserver,
    ) -> Result<HandOutcome, RoundError> {
        observer.on_event(&TableEvent::new(
            EventKind::HandStarted {
                dealer: self.seat_id(self.state.dealer_seat),
                small_blind: self.seat_id(self.state.small_blind_seat),
                big_blind: self.seat_id(self.state.big_blind_seat),
            },
            &self.state,
        ));
        self.deal_hole_cards()?;
        let (small, big) = self.post_blinds();
        observer.on_event(&TableEvent::new(EventKind::BlindsPosted { small, big }, &self.state));

        let mut phases = Vec::with_capacity(4);
        self.state.phase = Phase::PreFlop;
        if let Some(summary) = self.betting_phase(agents, observer)? {
            phases.push(summary);
        }

        for (phase, count) in [(Phase::Flop, 3), (Phase::Turn, 1), (Phase::River, 1)] {
            if self.state.players_in_hand() <= 1 {
                break;
            }
            self.reveal(phase, count, observer)?;
            if let Some(summary) = self.betting_phase(agents, observer)? {
                phases.push(summary);
            }
        }

        let mut outcome = if self.state.players_in_hand() <= 1 {
            self.resolve_without_showdown(observer)?
        } else {
            self.showdown(observer)?
        };
        outcome.phases = phases;
        self.hands_played += 1;
        Ok(outcome)
    }

    /// Undo a half-played hand: refund each player's contribution and leave
    /// an empty pot.
    fn abort_hand(&mut self, err: &RoundError) {
        let s = &mut self.state;
        for p in &mut s.players {
            let refund = p.contributed();
            p.chips += refund;
            p.contributed = 0;
            p.bet = 0;
            if p.chips > 0 {
                p.all_in = false;
            }
        }
        warn!(error = %err, refunded = s.pot, "hand aborted");
        s.pot = 0;
        s.current_bet = 0;
    }

    fn seat_id(&self, seat: usize) -> PlayerId {
        self.state.players.get(seat).map_or(PlayerId(seat), |p| p.id())
    }

    fn start_hand<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), RoundError> {
        let s = &mut self.state;
        for p in &mut s.players {
            p.reset_for_hand();
            // busted players sit out until the caller removes them
            if p.chips() == 0 {
                p.folded = true;
            }
        }
        let seated = s.players_in_hand();
        if seated < 2 {
            return Err(RoundError::NotEnoughPlayers(seated));
        }

        let n = s.players.len();
        let rotated = self.button.map_or(0, |b| (b + 1) % n);
        let dealer = if s.players[rotated].in_hand() { rotated } else { s.next_in_hand(rotated) };
        self.button = Some(dealer);
        s.dealer_seat = dealer;
        if seated == 2 {
            // heads-up: the dealer posts the small blind
            s.small_blind_seat = dealer;
        } else {
            s.small_blind_seat = s.next_in_hand(dealer);
        }
        s.big_blind_seat = s.next_in_hand(s.small_blind_seat);

        s.deck = Deck::standard().shuffled(rng);
        s.board.clear();
        s.pot = 0;
        s.current_bet = 0;
        s.phase = Phase::Setup;
        info!(
            hand = self.hands_played + 1,
            dealer = %s.players[dealer].id(),
            players = seated,
            "hand started"
        );
        Ok(())
    }

    /// Two passes round the table, one card per player per pass, starting
    /// left of the dealer.
    fn deal_hole_cards(&mut self) -> Result<(), RoundError> {
        let order: Vec<usize> = self
            .state
            .seats_from(self.state.dealer_seat + 1)
            .filter(|&i| self.state.players[i].in_hand())
            .collect();
        let mut passes: Vec<Vec<Card>> = vec![Vec::with_capacity(2); self.state.players.len()];
        for _ in 0..2 {
            for &seat in &order {
                passes[seat].extend(self.state.deal(1)?);
            }
        }
        for &seat in &order {
            let hole = HoleCards::from_slice(&passes[seat])?;
            debug!(player = %self.state.players[seat].id(), "hole cards dealt");
            self.state.players[seat].hole = Some(hole);
        }
        Ok(())
    }

    /// Blinds are capped at the poster's stack; a short blind is all-in.
    fn post_blinds(&mut self) -> (u64, u64) {
        let (sb, bb) = (self.config.small_blind, self.config.big_blind);
        let s = &mut self.state;
        let (sb_seat, bb_seat) = (s.small_blind_seat, s.big_blind_seat);
        let mut post = |seat: usize, amount: u64| {
            let p = &mut s.players[seat];
            let paid = p.commit(amount);
            if paid < amount {
                warn!(player = %p.id(), owed = amount, paid, "blind capped at stack");
            }
            s.pot += paid;
            paid
        };
        let small = post(sb_seat, sb);
        let big = post(bb_seat, bb);
        s.current_bet = bb;
        debug!(small, big, pot = s.pot, "blinds posted");
        (small, big)
    }

    fn reveal(
        &mut self,
        phase: Phase,
        count: usize,
        observer: &mut dyn TableObserver,
    ) -> Result<(), RoundError> {
        let (burned, rest) = self.state.deck.burn()?;
        self.state.deck = rest;
        let cards = self.state.deal(count)?;
        self.state.board.reveal(&cards)?;
        self.state.current_bet = 0;
        self.state.phase = phase;
        debug!(%phase, %burned, "burned one");
        info!(
            %phase,
            board = %cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "),
            pot = self.state.pot,
            "community cards dealt"
        );
        observer.on_event(&TableEvent::new(EventKind::CommunityDealt { cards }, &self.state));
        Ok(())
    }

    /// Run the current phase's betting unless nobody is left to bet against:
    /// when at most one player can act and owes nothing, the phase is dealt
    /// without action.
    fn betting_phase(
        &mut self,
        agents: &mut AgentTable,
        observer: &mut dyn TableObserver,
    ) -> Result<Option<PhaseSummary>, RoundError> {
        let s = &self.state;
        let owes = s.players.iter().any(|p| p.can_act() && p.bet() < s.current_bet);
        if s.players_able_to_act() < 2 && !owes {
            debug!(phase = %s.phase, "no betting possible");
            self.state.clear_bets();
            return Ok(None);
        }
        let summary = BettingRound::start(&self.state).run(&mut self.state, agents, observer)?;
        info!(
            phase = %summary.phase,
            actions = summary.actions,
            pot = self.state.pot,
            "betting closed"
        );
        Ok(Some(summary))
    }

    fn award(&mut self, winner: PlayerId) -> u64 {
        let amount = std::mem::take(&mut self.state.pot);
        if let Some(p) = self.state.players.iter_mut().find(|p| p.id() == winner) {
            p.chips += amount;
        }
        self.state.clear_bets();
        amount
    }

    fn resolve_without_showdown(
        &mut self,
        observer: &mut dyn TableObserver,
    ) -> Result<HandOutcome, RoundError> {
        let winner = self
            .state
            .players
            .iter()
            .find(|p| p.in_hand())
            .map(|p| p.id())
            .ok_or(RoundError::NotEnoughPlayers(0))?;
        let amount = self.award(winner);
        info!(%winner, amount, "pot awarded without showdown");
        observer.on_event(&TableEvent::new(
            EventKind::PotAwarded { winner, amount, showdown: false },
            &self.state,
        ));
        Ok(HandOutcome {
            winner,
            amount,
            showdown: false,
            hands: Vec::new(),
            board: self.state.board.as_slice().to_vec(),
            phases: Vec::new(),
        })
    }

    /// Evaluate every remaining hand, in seat order from the small blind so
    /// an exact tie goes to the earliest of them.
    fn showdown(&mut self, observer: &mut dyn TableObserver) -> Result<HandOutcome, RoundError> {
        self.state.phase = Phase::Showdown;
        let mut hands = Vec::new();
        for seat in self.state.seats_from(self.state.small_blind_seat) {
            let p = &self.state.players[seat];
            if !p.in_hand() {
                continue;
            }
            let hole = p.hole().ok_or(HandError::HoleCount(0))?;
            let best = best_hand(&hole.with_board(&self.state.board))?;
            debug!(player = %p.id(), hand = %best, "hand revealed");
            hands.push((p.id(), best));
        }
        observer.on_event(&TableEvent::new(EventKind::Showdown { hands: hands.clone() }, &self.state));

        let winner = showdown_winner(&hands).ok_or(RoundError::NotEnoughPlayers(0))?;
        let amount = self.award(winner);
        info!(%winner, amount, "pot awarded at showdown");
        observer.on_event(&TableEvent::new(
            EventKind::PotAwarded { winner, amount, showdown: true },
            &self.state,
        ));
        Ok(HandOutcome {
            winner,
            amount,
            showdown: true,
            hands,
            board: self.state.board.as_slice().to_vec(),
            phases: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{CallingAgent, ScriptedAgent};
    use crate::betting::Action;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn calling_table(n: usize) -> AgentTable {
        (0..n).fold(AgentTable::new(), |t, i| t.with_agent(PlayerId(i), CallingAgent))
    }

    fn total_chips(c: &RoundController) -> u64 {
        c.players().iter().map(|p| p.chips()).sum::<u64>() + c.state().pot()
    }

    #[test]
    fn blinds_and_button_rotate_each_hand() {
        let mut c = RoundController::new(TableConfig::default().with_player_count(4)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut agents = calling_table(4);
        let mut seen = Vec::new();
        for _ in 0..5 {
            c.play_hand(&mut rng, &mut agents, &mut ()).unwrap();
            let s = c.state();
            seen.push((s.dealer_seat(), s.small_blind_seat(), s.big_blind_seat()));
        }
        assert_eq!(seen, vec![(0, 1, 2), (1, 2, 3), (2, 3, 0), (3, 0, 1), (0, 1, 2)]);
    }

    #[test]
    fn check_down_reaches_showdown_with_full_board() {
        let mut c = RoundController::new(TableConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut events = Vec::new();
        let out = c.play_hand(&mut rng, &mut calling_table(3), &mut events).unwrap();
        assert!(out.showdown);
        assert_eq!(out.board.len(), 5);
        assert_eq!(out.hands.len(), 3);
        assert_eq!(out.amount, 30);
        assert_eq!(out.phases.len(), 4);
        assert_eq!(total_chips(&c), 3000);
        // 52 - 6 hole - 3 burns - 5 board
        assert_eq!(c.state().deck().len(), 38);
        let reveals = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::CommunityDealt { .. }))
            .count();
        assert_eq!(reveals, 3);
    }

    #[test]
    fn everyone_folds_to_big_blind() {
        let mut c = RoundController::new(TableConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // first hand: dealer 0, SB 1, BB 2; seat 0 then seat 1 fold
        let mut agents = AgentTable::new()
            .with_agent(PlayerId(0), ScriptedAgent::new([Action::Fold]))
            .with_agent(PlayerId(1), ScriptedAgent::new([Action::Fold]))
            .with_agent(PlayerId(2), CallingAgent);
        let out = c.play_hand(&mut rng, &mut agents, &mut ()).unwrap();
        assert!(!out.showdown);
        assert_eq!(out.winner, PlayerId(2));
        assert_eq!(out.amount, 15);
        assert!(out.board.is_empty());
        assert_eq!(c.players()[2].chips(), 1005);
        assert_eq!(c.players()[1].chips(), 995);
    }

    #[test]
    fn short_blind_is_capped_and_all_in() {
        let mut c = RoundController::new(TableConfig::default()).unwrap();
        c.state.players[2].chips = 4;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let out = c.play_hand(&mut rng, &mut calling_table(3), &mut ()).unwrap();
        assert!(out.showdown);
        // 10 + 10 from callers, 4 from the capped big blind
        assert_eq!(out.amount, 24);
        assert_eq!(total_chips(&c), 2004);
    }

    #[test]
    fn illegal_action_surfaces_as_error() {
        let mut c = RoundController::new(TableConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut agents = calling_table(3);
        agents.set_agent(PlayerId(0), Box::new(ScriptedAgent::new([Action::Check])));
        let err = c.play_hand(&mut rng, &mut agents, &mut ()).unwrap_err();
        assert_eq!(err, RoundError::Action(ActionError::CheckFacingBet { to_call: 10 }));
    }

    #[test]
    fn aborted_hand_refunds_every_contribution() {
        let mut c = RoundController::new(TableConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut agents = calling_table(3);
        // seat 1 completes the small blind, then overbets the flop
        agents.set_agent(
            PlayerId(1),
            Box::new(ScriptedAgent::new([Action::Call(5), Action::Raise(999_999)])),
        );
        let err = c.play_hand(&mut rng, &mut agents, &mut ()).unwrap_err();
        assert_eq!(
            err,
            RoundError::Action(ActionError::InsufficientChips { needed: 999_999, available: 990 })
        );
        assert_eq!(c.state().pot(), 0);
        assert!(c.players().iter().all(|p| p.chips() == 1000 && p.contributed() == 0));
        assert_eq!(c.hands_played(), 0);

        c.play_hand(&mut rng, &mut calling_table(3), &mut ()).unwrap();
        assert_eq!(total_chips(&c), 3000);
    }

    #[test]
    fn busted_players_are_removed_and_button_kept() {
        let mut c = RoundController::new(TableConfig::default().with_player_count(4)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        c.play_hand(&mut rng, &mut calling_table(4), &mut ()).unwrap();
        c.play_hand(&mut rng, &mut calling_table(4), &mut ()).unwrap();
        assert_eq!(c.state().dealer_seat(), 1);
        c.state.players[0].chips = 0;
        let busted = c.remove_busted();
        assert_eq!(busted.len(), 1);
        assert_eq!(c.players().len(), 3);
        c.play_hand(&mut rng, &mut calling_table(4), &mut ()).unwrap();
        // button was on id 1 (now seat 0) and moves to id 2
        assert_eq!(c.players()[c.state().dealer_seat()].id(), PlayerId(2));
    }

    #[test]
    fn too_few_funded_players_is_an_error() {
        let mut c = RoundController::new(TableConfig::default()).unwrap();
        c.state.players[0].chips = 0;
        c.state.players[1].chips = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let err = c.play_hand(&mut rng, &mut calling_table(3), &mut ()).unwrap_err();
        assert_eq!(err, RoundError::NotEnoughPlayers(1));
    }
}
