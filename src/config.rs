use crate::player::{Player, PlayerId};

pub const MIN_SEATS: usize = 2;
/// Eight players use at most 16 hole cards + 3 burns + 5 board cards.
pub const MAX_SEATS: usize = 8;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("table needs between 2 and 8 seats, got {0}")]
    SeatCount(usize),
    #[error("big blind must be positive")]
    ZeroBigBlind,
    #[error("small blind {small} exceeds big blind {big}")]
    BlindOrder { small: u64, big: u64 },
}

/// Table stakes and seating.
///
/// ```
/// use holdem_round::config::TableConfig;
///
/// let cfg = TableConfig::default().with_blinds(10, 20).with_seats(["Ann", "Bo"]);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.players().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub starting_chips: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    pub seats: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_chips: 1000,
            small_blind: 5,
            big_blind: 10,
            seats: vec!["P1".into(), "P2".into(), "P3".into()],
        }
    }
}

impl TableConfig {
    /// `n` seats named `P1..Pn`.
    pub fn with_player_count(mut self, n: usize) -> Self {
        self.seats = (1..=n).map(|i| format!("P{i}")).collect();
        self
    }

    pub fn with_seats<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seats = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_blinds(mut self, small: u64, big: u64) -> Self {
        self.small_blind = small;
        self.big_blind = big;
        self
    }

    pub fn with_starting_chips(mut self, chips: u64) -> Self {
        self.starting_chips = chips;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats.len()) {
            return Err(ConfigError::SeatCount(self.seats.len()));
        }
        if self.big_blind == 0 {
            return Err(ConfigError::ZeroBigBlind);
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::BlindOrder { small: self.small_blind, big: self.big_blind });
        }
        Ok(())
    }

    /// Fresh players in seat order, ids matching seat indices.
    pub fn players(&self) -> Vec<Player> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId(i), name.clone(), self.starting_chips))
            .collect()
    }
}
