use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DECK_SIZE: usize = 52;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("cannot deal {requested} cards, only {remaining} remain")]
    NotEnoughCards { requested: usize, remaining: usize },
}

/// An ordered deck. The front of the sequence is the top of the deck.
///
/// Operations that change the order or remove cards return a new `Deck`
/// and leave the receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use holdem_round::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards =
            Suit::ALL.iter().flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s))).collect();
        Self { cards }
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

    /// Uniform permutation of this deck (Fisher-Yates) drawn from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Deck {
        let mut cards = self.cards.clone();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// Shuffle with a ChaCha8 stream seeded from `seed`, for reproducible deals.
    pub fn shuffled_seeded(&self, seed: u64) -> Deck {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffled(&mut rng)
    }

    /// Take `count` cards off the top.
    ///
    /// ```
    /// use holdem_round::deck::Deck;
    ///
    /// let (dealt, rest) = Deck::standard().deal(5).unwrap();
    /// assert_eq!(dealt.len(), 5);
    /// assert_eq!(rest.len(), 47);
    /// assert!(rest.deal(48).is_err());
    /// ```
    pub fn deal(&self, count: usize) -> Result<(Vec<Card>, Deck), DeckError> {
        if count > self.cards.len() {
            return Err(DeckError::NotEnoughCards { requested: count, remaining: self.cards.len() });
        }
        let (dealt, rest) = self.cards.split_at(count);
        Ok((dealt.to_vec(), Deck { cards: rest.to_vec() }))
    }

    /// Discard the top card.
    pub fn burn(&self) -> Result<(Card, Deck), DeckError> {
        let (mut dealt, rest) = self.deal(1)?;
        match dealt.pop() {
            Some(card) => Ok((card, rest)),
            None => Err(DeckError::NotEnoughCards { requested: 1, remaining: 0 }),
        }
    }
}
