//! Node kind to rule dispatch.

use crate::traits::Interest;
use std::collections::HashMap;
use tsql_syntax::NodeKind;

/// Maps each node kind to the indices of the rules interested in it.
#[derive(Debug, Default)]
pub(crate) struct DispatchTable {
    by_kind: HashMap<NodeKind, Vec<usize>>,
}

impl DispatchTable {
    /// `interests[i]` are the interests of rule `i`.
    pub(crate) fn build(interests: &[&[Interest]]) -> Self {
        let mut by_kind: HashMap<NodeKind, Vec<usize>> = HashMap::new();
        for &kind in NodeKind::ALL {
            let rules: Vec<usize> = interests
                .iter()
                .enumerate()
                .filter(|(_, wanted)| wanted.iter().any(|interest| interest.matches(kind)))
                .map(|(index, _)| index)
                .collect();
            if !rules.is_empty() {
                by_kind.insert(kind, rules);
            }
        }
        Self { by_kind }
    }

    /// Rule indices for `kind`, in rule order, each at most once.
    pub(crate) fn rules_for(&self, kind: NodeKind) -> &[usize] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}
