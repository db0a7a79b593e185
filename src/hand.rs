use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::str::FromStr;

pub const MAX_BOARD_CARDS: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("board would hold {0} cards, at most 5 allowed")]
    TooManyBoardCards(usize),
    #[error("duplicate card on board: {0}")]
    DuplicateBoardCard(Card),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private cards.
///
/// ```
/// use holdem_round::cards::{Card, Rank, Suit};
/// use holdem_round::hand::HoleCards;
///
/// let hole = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::King, Suit::Spades),
/// ).unwrap();
/// assert_eq!(hole.as_array().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(slice.len())),
        }
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    /// Hole cards followed by the community cards: the candidate set for
    /// hand evaluation.
    pub fn with_board(&self, board: &Board) -> Vec<Card> {
        let mut out = Vec::with_capacity(2 + board.len());
        out.extend_from_slice(&self.as_array());
        out.extend_from_slice(board.as_slice());
        out
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Community cards in reveal order (flop, turn, river).
///
/// ```
/// use holdem_round::cards::{Card, Rank, Suit};
/// use holdem_round::hand::Board;
///
/// let mut board = Board::default();
/// board.reveal(&[
///     Card::new(Rank::Two, Suit::Clubs),
///     Card::new(Rank::Three, Suit::Clubs),
///     Card::new(Rank::Four, Suit::Clubs),
/// ]).unwrap();
/// assert_eq!(board.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        let mut board = Board::default();
        board.reveal(&cards)?;
        Ok(board)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Append revealed cards. Nothing is appended if the result would exceed
    /// five cards or repeat a card.
    pub fn reveal(&mut self, cards: &[Card]) -> Result<(), HandError> {
        let total = self.cards.len() + cards.len();
        if total > MAX_BOARD_CARDS {
            return Err(HandError::TooManyBoardCards(total));
        }
        let mut seen: HashSet<Card> = self.cards.iter().copied().collect();
        if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
            return Err(HandError::DuplicateBoardCard(*dup));
        }
        self.cards.extend_from_slice(cards);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}
