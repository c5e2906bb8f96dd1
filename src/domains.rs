//! The domain store: each variable's set of candidate words, plus the unary (node-consistency)
//! filter. Domains only ever shrink during a solve, and only here and in the arc-consistency
//! engine -- the backtracking search reads domains but never mutates them.

use std::collections::HashSet;

use crate::grid::Grid;
use crate::types::{GlobalWordId, VariableId};
use crate::word_list::WordList;

/// Per-variable candidate word sets, owned by a single solve call.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<HashSet<GlobalWordId>>,
}

impl DomainStore {
    /// Build the initial store, giving every variable the full word list as its domain.
    #[must_use]
    pub fn new(grid: &Grid, word_list: &WordList) -> DomainStore {
        let all_words: HashSet<GlobalWordId> = word_list
            .words
            .iter()
            .enumerate()
            .flat_map(|(length, bucket)| (0..bucket.len()).map(move |word_id| (length, word_id)))
            .collect();

        DomainStore {
            domains: grid.variables.iter().map(|_| all_words.clone()).collect(),
        }
    }

    /// Remove from each variable's domain every word whose length differs from the variable's
    /// length. A variable may legitimately end up with an empty domain here if no word of the
    /// right length exists; that's detected downstream. Returns the number of removals.
    pub fn enforce_node_consistency(&mut self, grid: &Grid) -> usize {
        let mut removed = 0;

        for (variable_id, variable) in grid.variables.iter().enumerate() {
            // Iterate over a snapshot, since we're removing from the live set.
            for global_word_id in self.snapshot(variable_id) {
                if global_word_id.0 != variable.length {
                    self.domains[variable_id].remove(&global_word_id);
                    removed += 1;
                }
            }
        }

        removed
    }

    /// Borrow the given variable's domain.
    #[must_use]
    pub fn get(&self, variable_id: VariableId) -> &HashSet<GlobalWordId> {
        &self.domains[variable_id]
    }

    /// Collect the given variable's domain into an owned vec, so that the live set can be mutated
    /// while iterating.
    #[must_use]
    pub fn snapshot(&self, variable_id: VariableId) -> Vec<GlobalWordId> {
        self.domains[variable_id].iter().copied().collect()
    }

    /// Remove a word from the given variable's domain, returning whether it was present.
    pub fn remove(&mut self, variable_id: VariableId, global_word_id: GlobalWordId) -> bool {
        self.domains[variable_id].remove(&global_word_id)
    }

    /// The number of words remaining in the given variable's domain.
    #[must_use]
    pub fn size(&self, variable_id: VariableId) -> usize {
        self.domains[variable_id].len()
    }

    #[must_use]
    pub fn is_empty(&self, variable_id: VariableId) -> bool {
        self.domains[variable_id].is_empty()
    }

    /// The total number of candidates remaining across all variables.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.domains.iter().map(HashSet::len).sum()
    }
}
