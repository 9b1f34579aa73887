//! Match search over a field of cards.
//!
//! Pairs are scanned in ascending index order `(i, j)` with `i < j`. For
//! each pair the complement is derived and looked up in a feature index
//! of the field, so a scan is O(n²) with O(1) membership checks.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::triple::{derive_complement, MatchTriple};
use crate::cards::Card;

/// Positions of each feature combination present in a field.
struct FieldIndex {
    positions: FxHashMap<Card, SmallVec<[usize; 2]>>,
}

impl FieldIndex {
    fn new(field: &[Card]) -> Self {
        let mut positions: FxHashMap<Card, SmallVec<[usize; 2]>> = FxHashMap::default();
        for (i, card) in field.iter().enumerate() {
            positions.entry(*card).or_default().push(i);
        }
        Self { positions }
    }

    /// First position holding a card feature-equal to `card`, other than `i` and `j`.
    fn position_except(&self, card: &Card, i: usize, j: usize) -> Option<usize> {
        self.positions
            .get(card)?
            .iter()
            .copied()
            .find(|&k| k != i && k != j)
    }
}

/// Stateless match search.
///
/// Search results hold the actual field cards, so a returned triple can
/// be removed from the field by identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchEngine;

impl MatchEngine {
    /// Every `[k, i, j]` position triple where `field[k]` completes the pair `(i, j)`.
    fn scan(field: &[Card]) -> impl Iterator<Item = [usize; 3]> + '_ {
        let index = FieldIndex::new(field);
        let n = field.len();

        (0..n)
            .flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
            .filter_map(move |(i, j)| {
                let complement = derive_complement(&field[i], &field[j])?;
                let k = index.position_except(&complement, i, j)?;
                Some([k, i, j])
            })
    }

    fn triple_at(field: &[Card], [k, i, j]: [usize; 3]) -> Option<MatchTriple> {
        MatchTriple::new(field[k], field[i], field[j])
    }

    /// Field positions of the first match found, complement first.
    #[must_use]
    pub fn first_match_positions(field: &[Card]) -> Option<[usize; 3]> {
        Self::scan(field).next()
    }

    /// The first match in scan order.
    #[must_use]
    pub fn first_match(field: &[Card]) -> Option<MatchTriple> {
        Self::scan(field).find_map(|positions| Self::triple_at(field, positions))
    }

    /// Whether the field holds any match.
    #[must_use]
    pub fn has_match(field: &[Card]) -> bool {
        Self::scan(field).next().is_some()
    }

    /// Every distinct match in the field, in order of first discovery.
    ///
    /// Each match is reachable from three different pairs; duplicates
    /// are dropped.
    #[must_use]
    pub fn all_matches(field: &[Card]) -> Vec<MatchTriple> {
        let mut seen = FxHashSet::default();
        Self::scan(field)
            .filter_map(|positions| Self::triple_at(field, positions))
            .filter(|triple| seen.insert(*triple))
            .collect()
    }
}
