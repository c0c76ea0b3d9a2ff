//! Boolean combinators over sub-query results.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::DocId;
use crate::index::posting::{MatchRange, Matches};

/// Set operator applied to the document ids of a combinator's operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Intersection
    And,
    /// Union
    Or,
    /// Symmetric difference
    Xor,
}

impl Operator {
    /// Combine two id sets.
    pub fn apply(&self, left: &BTreeSet<DocId>, right: &BTreeSet<DocId>) -> BTreeSet<DocId> {
        match self {
            Operator::And => left.intersection(right).copied().collect(),
            Operator::Or => left.union(right).copied().collect(),
            Operator::Xor => left.symmetric_difference(right).copied().collect(),
        }
    }

    /// Get the operator name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Folds operand results into one match map.
///
/// Ids are combined pairwise left to right in operand order. For every
/// surviving id the ranges of all operands that matched it are concatenated
/// in operand order, without sorting or de-duplication.
#[derive(Debug)]
pub struct Combiner {
    operator: Operator,
    ids: Option<BTreeSet<DocId>>,
    results: Vec<Matches>,
}

impl Combiner {
    /// Start a fold for `operator`.
    pub fn new(operator: Operator) -> Self {
        Combiner {
            operator,
            ids: None,
            results: Vec::new(),
        }
    }

    /// Fold in the result of the next operand.
    pub fn push(&mut self, matches: Matches) {
        let operand_ids: BTreeSet<DocId> = matches.keys().copied().collect();
        self.ids = Some(match self.ids.take() {
            None => operand_ids,
            Some(acc) => self.operator.apply(&acc, &operand_ids),
        });
        self.results.push(matches);
    }

    /// True once further operands cannot change the result.
    ///
    /// Only an empty intersection is final: union can still grow and
    /// symmetric difference can still gain ids.
    pub fn is_settled(&self) -> bool {
        self.operator == Operator::And && self.ids.as_ref().is_some_and(|ids| ids.is_empty())
    }

    /// Finish the fold. A fold without operands yields an empty map.
    pub fn finish(self) -> Matches {
        let Some(ids) = self.ids else {
            return Matches::new();
        };

        ids.into_iter()
            .map(|id| {
                let ranges: Vec<MatchRange> = self
                    .results
                    .iter()
                    .filter_map(|m| m.get(&id))
                    .flatten()
                    .copied()
                    .collect();
                (id, ranges)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(entries: &[(DocId, Vec<(usize, usize)>)]) -> Matches {
        entries
            .iter()
            .map(|(id, ranges)| (*id, ranges.iter().map(|&r| MatchRange::from(r)).collect()))
            .collect()
    }

    fn ids(m: &Matches) -> Vec<DocId> {
        m.keys().copied().collect()
    }

    #[test]
    fn test_operator_apply() {
        let a = BTreeSet::from([1, 2, 3]);
        let b = BTreeSet::from([2, 3, 4]);

        assert_eq!(Operator::And.apply(&a, &b), BTreeSet::from([2, 3]));
        assert_eq!(Operator::Or.apply(&a, &b), BTreeSet::from([1, 2, 3, 4]));
        assert_eq!(Operator::Xor.apply(&a, &b), BTreeSet::from([1, 4]));
    }

    #[test]
    fn test_ranges_concatenate_in_operand_order() {
        let mut combiner = Combiner::new(Operator::Or);
        combiner.push(matches(&[(1, vec![(0, 3)]), (2, vec![(4, 7)])]));
        combiner.push(matches(&[(1, vec![(5, 8), (0, 3)])]));

        let result = combiner.finish();
        assert_eq!(
            result.get(&1),
            Some(&vec![
                MatchRange::new(0, 3),
                MatchRange::new(5, 8),
                MatchRange::new(0, 3)
            ])
        );
        assert_eq!(result.get(&2), Some(&vec![MatchRange::new(4, 7)]));
    }

    #[test]
    fn test_xor_folds_left_to_right() {
        // ((A xor B) xor C) with A={1,2}, B={2,3}, C={1,3} -> {1,3} xor {1,3} = {}
        let mut combiner = Combiner::new(Operator::Xor);
        combiner.push(matches(&[(1, vec![(0, 3)]), (2, vec![(0, 3)])]));
        combiner.push(matches(&[(2, vec![(0, 3)]), (3, vec![(0, 3)])]));
        combiner.push(matches(&[(1, vec![(0, 3)]), (3, vec![(0, 3)])]));
        assert!(combiner.finish().is_empty());

        // A={1}, B={1}, C={1} -> {} xor {1} = {1}
        let mut combiner = Combiner::new(Operator::Xor);
        for _ in 0..3 {
            combiner.push(matches(&[(1, vec![(2, 5)])]));
        }
        let result = combiner.finish();
        assert_eq!(ids(&result), vec![1]);
        // Every operand holding the id contributes its ranges.
        assert_eq!(result.get(&1).map(|r| r.len()), Some(3));
    }

    #[test]
    fn test_and_settles_on_empty_intersection() {
        let mut combiner = Combiner::new(Operator::And);
        combiner.push(matches(&[(1, vec![(0, 3)])]));
        assert!(!combiner.is_settled());
        combiner.push(matches(&[(2, vec![(0, 3)])]));
        assert!(combiner.is_settled());
        assert!(combiner.finish().is_empty());
    }

    #[test]
    fn test_empty_fold() {
        assert!(Combiner::new(Operator::Or).finish().is_empty());
        assert!(!Combiner::new(Operator::And).is_settled());
    }
}
