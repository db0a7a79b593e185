pub(crate) mod combinations;
pub(crate) mod rank_groups;
pub(crate) mod straight_info;

use crate::cards::Card;
use crate::player::PlayerId;
use combinations::FiveSubsets;
use core::cmp::Ordering;
use rank_groups::RankGroups;
use std::collections::HashSet;
use std::fmt;
use straight_info::{values_desc, StraightInfo};

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum HandRank {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandRank {
    pub const ALL: [HandRank; 10] = [
        HandRank::HighCard,
        HandRank::Pair,
        HandRank::TwoPair,
        HandRank::ThreeOfKind,
        HandRank::Straight,
        HandRank::Flush,
        HandRank::FullHouse,
        HandRank::FourOfKind,
        HandRank::StraightFlush,
        HandRank::RoyalFlush,
    ];

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::Pair => "Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("need between 5 and 7 cards to evaluate, got {0}")]
    CardCount(usize),
    #[error("duplicate card in evaluation input: {0}")]
    DuplicateCard(Card),
}

/// Classify exactly five cards.
///
/// ```
/// use holdem_round::cards::parse_cards;
/// use holdem_round::evaluator::{get_rank, HandRank};
///
/// let cards = parse_cards("Ts Js Qs Ks As").unwrap();
/// let five = [cards[0], cards[1], cards[2], cards[3], cards[4]];
/// assert_eq!(get_rank(&five), HandRank::RoyalFlush);
/// ```
pub fn get_rank(cards: &[Card; 5]) -> HandRank {
    let straight = StraightInfo::detect(cards);
    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let groups = RankGroups::of(cards);

    match (straight.is_straight(), flush) {
        (true, true) if straight.is_broadway() => return HandRank::RoyalFlush,
        (true, true) => return HandRank::StraightFlush,
        _ => {}
    }
    if groups.max_count() == 4 {
        return HandRank::FourOfKind;
    }
    if groups.is_full_house() {
        return HandRank::FullHouse;
    }
    if flush {
        return HandRank::Flush;
    }
    if straight.is_straight() {
        return HandRank::Straight;
    }
    if groups.max_count() == 3 {
        return HandRank::ThreeOfKind;
    }
    match groups.pairs().len() {
        2 => HandRank::TwoPair,
        1 => HandRank::Pair,
        _ => HandRank::HighCard,
    }
}

/// Break a tie between two hands already known to share `rank`.
///
/// Hands with a repeated-value structure compare that structure first
/// (paired, tripled or quad value; both pairs; trips then pair). Whatever
/// remains equal is settled by comparing values sorted high to low.
/// `Ordering::Equal` means a true tie.
pub fn compare_with_same_rank(a: &[Card; 5], b: &[Card; 5], rank: HandRank) -> Ordering {
    let (ga, gb) = (RankGroups::of(a), RankGroups::of(b));
    let structure = match rank {
        HandRank::Pair => ga.value_with_count(2).cmp(&gb.value_with_count(2)),
        HandRank::TwoPair => ga.pairs().cmp(&gb.pairs()),
        HandRank::ThreeOfKind => ga.value_with_count(3).cmp(&gb.value_with_count(3)),
        HandRank::FourOfKind => ga.value_with_count(4).cmp(&gb.value_with_count(4)),
        HandRank::FullHouse => (ga.value_with_count(3), ga.value_with_count(2))
            .cmp(&(gb.value_with_count(3), gb.value_with_count(2))),
        _ => Ordering::Equal,
    };
    structure.then_with(|| values_desc(a).cmp(&values_desc(b)))
}

/// The best five cards found for a player and their category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestHand {
    pub cards: [Card; 5],
    pub rank: HandRank,
}

impl BestHand {
    pub fn of(cards: [Card; 5]) -> Self {
        Self { rank: get_rank(&cards), cards }
    }

    /// Rank ordinal first, then [`compare_with_same_rank`].
    pub fn compare(&self, other: &BestHand) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| compare_with_same_rank(&self.cards, &other.cards, self.rank))
    }
}

impl fmt::Display for BestHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.rank)?;
        for (i, c) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("]")
    }
}

/// Best five-card hand out of 5 to 7 distinct cards.
///
/// Every five-card subset is classified; a later subset only replaces the
/// current best when it is strictly stronger, so equal subsets keep the
/// earliest one.
///
/// ```
/// use holdem_round::cards::parse_cards;
/// use holdem_round::evaluator::{best_hand, HandRank};
///
/// let seven = parse_cards("As Ah Kc Qd Jh 3s 2c").unwrap();
/// let best = best_hand(&seven).unwrap();
/// assert_eq!(best.rank, HandRank::Pair);
/// ```
pub fn best_hand(candidates: &[Card]) -> Result<BestHand, EvalError> {
    if !(5..=7).contains(&candidates.len()) {
        return Err(EvalError::CardCount(candidates.len()));
    }
    let mut seen = HashSet::with_capacity(candidates.len());
    if let Some(dup) = candidates.iter().find(|c| !seen.insert(**c)) {
        return Err(EvalError::DuplicateCard(*dup));
    }

    let best = FiveSubsets::new(candidates.len())
        .map(|idx| BestHand::of(idx.map(|i| candidates[i])))
        .reduce(|best, next| if next.compare(&best) == Ordering::Greater { next } else { best });
    best.ok_or(EvalError::CardCount(candidates.len()))
}

/// Pick a single winner among showdown candidates.
///
/// Candidates are reduced pairwise; a challenger must be strictly stronger to
/// take over, so a true tie goes to whoever appears first in `hands`.
pub fn showdown_winner(hands: &[(PlayerId, BestHand)]) -> Option<PlayerId> {
    hands
        .iter()
        .reduce(|best, next| if next.1.compare(&best.1) == Ordering::Greater { next } else { best })
        .map(|(id, _)| *id)
}
