use crate::hand::HoleCards;
use std::fmt;

/// Stable identity of a seat's occupant. Ids survive seat removal, so
/// betting state is keyed by id rather than by seat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) chips: u64,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) bet: u64,
    pub(crate) contributed: u64,
    pub(crate) folded: bool,
    pub(crate) all_in: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, chips: u64) -> Self {
        Self {
            id,
            name: name.into(),
            chips,
            hole: None,
            bet: 0,
            contributed: 0,
            folded: false,
            all_in: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chips behind, not yet committed to the pot.
    pub fn chips(&self) -> u64 {
        self.chips
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    /// Chips put in during the current betting phase.
    pub fn bet(&self) -> u64 {
        self.bet
    }

    /// Chips put in during the whole hand, blinds included.
    pub fn contributed(&self) -> u64 {
        self.contributed
    }

    pub fn is_folded(&self) -> bool {
        self.folded
    }

    pub fn is_all_in(&self) -> bool {
        self.all_in
    }

    /// Still owes decisions: neither folded nor all-in.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Still contesting the pot.
    pub fn in_hand(&self) -> bool {
        !self.folded
    }

    /// Clear everything but identity and chips.
    pub fn reset_for_hand(&mut self) {
        self.hole = None;
        self.bet = 0;
        self.contributed = 0;
        self.folded = false;
        self.all_in = false;
    }

    /// Move `amount` from the stack into this phase's bet. Callers validate
    /// against `chips` first; the stack never goes negative.
    pub(crate) fn commit(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.bet += paid;
        self.contributed += paid;
        if self.chips == 0 {
            self.all_in = true;
        }
        paid
    }
}
