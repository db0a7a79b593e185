use crate::cards::Card;

const WHEEL: [u8; 5] = [2, 3, 4, 5, 14];

/// Straight shape of five cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StraightInfo {
    None,
    /// Five consecutive values; carries the lowest and highest value.
    Run { low: u8, high: u8 },
    /// A-2-3-4-5, the Ace playing low.
    Wheel,
}

impl StraightInfo {
    pub fn detect(cards: &[Card; 5]) -> Self {
        let mut values = cards.map(Card::value);
        values.sort_unstable();
        if values == WHEEL {
            return StraightInfo::Wheel;
        }
        if values.windows(2).all(|w| w[1] == w[0] + 1) {
            return StraightInfo::Run { low: values[0], high: values[4] };
        }
        StraightInfo::None
    }

    pub fn is_straight(self) -> bool {
        !matches!(self, StraightInfo::None)
    }

    /// Ten through Ace.
    pub fn is_broadway(self) -> bool {
        matches!(self, StraightInfo::Run { low: 10, high: 14 })
    }
}

/// Card values sorted descending for kicker comparison. In a wheel the Ace
/// counts as 1, so `5-4-3-2-A` sorts as `[5, 4, 3, 2, 1]`.
pub fn values_desc(cards: &[Card; 5]) -> [u8; 5] {
    let wheel = StraightInfo::detect(cards) == StraightInfo::Wheel;
    let mut values = cards.map(|c| if wheel && c.value() == 14 { 1 } else { c.value() });
    values.sort_unstable_by(|a, b| b.cmp(a));
    values
}
