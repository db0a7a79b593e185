use crate::cards::Card;

/// Value frequencies of a five-card hand, sorted by (count desc, value desc).
///
/// Example: AAAKQ groups as [(14, 3), (13, 1), (12, 1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(u8, u8)>,
}

impl RankGroups {
    pub fn of(cards: &[Card; 5]) -> Self {
        let mut counts = [0u8; 15];
        for c in cards {
            counts[c.value() as usize] += 1;
        }
        let mut groups: Vec<(u8, u8)> =
            (2u8..=14).filter(|&v| counts[v as usize] > 0).map(|v| (v, counts[v as usize])).collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        Self { groups }
    }

    /// Highest frequency of any value.
    pub fn max_count(&self) -> u8 {
        self.groups.first().map_or(0, |&(_, c)| c)
    }

    /// Value of the first group with exactly `count` cards.
    pub fn value_with_count(&self, count: u8) -> Option<u8> {
        self.groups.iter().find(|(_, c)| *c == count).map(|(v, _)| *v)
    }

    /// Paired values, highest first.
    pub fn pairs(&self) -> Vec<u8> {
        self.groups.iter().filter(|(_, c)| *c == 2).map(|(v, _)| *v).collect()
    }

    pub fn is_full_house(&self) -> bool {
        self.value_with_count(3).is_some() && self.value_with_count(2).is_some()
    }
}
