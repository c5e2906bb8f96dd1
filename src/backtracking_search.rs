//! This module implements the solver's search stage: chronological backtracking over the
//! arc-consistent domains, ordering variables with the minimum-remaining-values heuristic (ties
//! broken by degree, then by lowest variable id) and ordering candidate words with the
//! least-constraining-value heuristic. The domain store is read-only here; each tentative choice
//! is validated by re-checking the whole assignment and undone if it doesn't lead to a solution.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use crate::arc_consistency::ac3;
use crate::domains::DomainStore;
use crate::grid::Grid;
use crate::types::{GlobalWordId, VariableId};
use crate::word_list::WordList;
use crate::{CHECK_INVARIANTS, LOG_SOLVE_PROCESS};

/// A partial assignment of words to variables, indexed by `VariableId`. Built and undone
/// incrementally by the search; owned by a single search path.
#[derive(Debug, Clone)]
pub struct Assignment {
    entries: Vec<Option<GlobalWordId>>,
    assigned_count: usize,
}

impl Assignment {
    #[must_use]
    pub fn new(variable_count: usize) -> Assignment {
        Assignment {
            entries: vec![None; variable_count],
            assigned_count: 0,
        }
    }

    #[must_use]
    pub fn get(&self, variable_id: VariableId) -> Option<GlobalWordId> {
        self.entries[variable_id]
    }

    #[must_use]
    pub fn is_assigned(&self, variable_id: VariableId) -> bool {
        self.entries[variable_id].is_some()
    }

    /// Is there one entry per variable?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.entries.len()
    }

    /// Iterate over the assigned `(variable_id, word_id)` pairs in variable id order.
    pub fn iter_assigned(&self) -> impl Iterator<Item = (VariableId, GlobalWordId)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(variable_id, entry)| entry.map(|word_id| (variable_id, word_id)))
    }

    fn set(&mut self, variable_id: VariableId, word_id: GlobalWordId) {
        if self.entries[variable_id].is_none() {
            self.assigned_count += 1;
        }
        self.entries[variable_id] = Some(word_id);
    }

    fn clear(&mut self, variable_id: VariableId) {
        if self.entries[variable_id].take().is_some() {
            self.assigned_count -= 1;
        }
    }
}

/// A struct tracking stats about the solve process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: usize,
    pub backtracks: usize,
    pub node_consistency_eliminations: usize,
    pub arc_consistency_eliminations: usize,
    pub total_time: Duration,
}

/// A struct recording the word chosen for one variable.
#[derive(Debug, Clone)]
pub struct Choice {
    pub variable_id: VariableId,
    pub word_id: GlobalWordId,
}

/// A struct representing the results of a successful solve.
#[derive(Debug)]
pub struct Solution {
    pub choices: Vec<Choice>,
    pub statistics: Statistics,
}

/// The explicit failure marker for a solve: the search proved that no complete, consistent
/// assignment exists under the given grid and word list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveFailure {
    Unsatisfiable,
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveFailure::Unsatisfiable => write!(f, "no solution"),
        }
    }
}

/// Is the assignment consistent as a whole? It is iff no two variables share a word, every
/// assigned word's length matches its variable's length, and every pair of assigned neighbors
/// agrees on the shared letter. The whole assignment is re-examined on each call.
#[must_use]
pub fn consistent(grid: &Grid, word_list: &WordList, assignment: &Assignment) -> bool {
    // Word uniqueness is global, not just between neighbors. Global word ids are unique per
    // normalized string, so comparing them is comparing words.
    let mut seen: HashSet<GlobalWordId> = HashSet::new();
    for (_, word_id) in assignment.iter_assigned() {
        if !seen.insert(word_id) {
            return false;
        }
    }

    for (variable_id, word_id) in assignment.iter_assigned() {
        if word_list.get_word(word_id).glyphs.len() != grid.variables[variable_id].length {
            return false;
        }
    }

    for (variable_id, word_id) in assignment.iter_assigned() {
        for &neighbor_id in grid.neighbors(variable_id) {
            let Some(neighbor_word_id) = assignment.get(neighbor_id) else {
                continue;
            };

            let (i, j) = grid
                .overlap(variable_id, neighbor_id)
                .expect("neighbors must overlap");

            let word = word_list.get_word(word_id);
            let neighbor_word = word_list.get_word(neighbor_word_id);

            if word.glyphs[i] != neighbor_word.glyphs[j] {
                return false;
            }
        }
    }

    true
}

/// Choose the unassigned variable with the fewest remaining domain candidates
/// (minimum-remaining-values). Ties are broken by the highest degree, then by the lowest
/// variable id, so the result is deterministic. Returns `None` iff every variable is assigned.
#[must_use]
pub fn select_unassigned_variable(
    grid: &Grid,
    domains: &DomainStore,
    assignment: &Assignment,
) -> Option<VariableId> {
    let mut best: Option<VariableId> = None;

    for variable_id in 0..grid.variables.len() {
        if assignment.is_assigned(variable_id) {
            continue;
        }

        let better = match best {
            None => true,
            Some(best_id) => {
                let size = domains.size(variable_id);
                let best_size = domains.size(best_id);
                size < best_size
                    || (size == best_size && grid.degree(variable_id) > grid.degree(best_id))
            }
        };

        if better {
            best = Some(variable_id);
        }
    }

    best
}

/// Return the variable's domain in ascending order of how many candidates choosing each word
/// would eliminate from unassigned neighbors' domains (least-constraining-value first). Ties keep
/// global word id order, so repeated calls always produce the same sequence.
#[must_use]
pub fn order_domain_values(
    grid: &Grid,
    word_list: &WordList,
    domains: &DomainStore,
    assignment: &Assignment,
    variable_id: VariableId,
) -> Vec<GlobalWordId> {
    let mut candidates = domains.snapshot(variable_id);

    // Set iteration order is arbitrary; pin it down before the heuristic sort so that ties are
    // broken the same way every time.
    candidates.sort_unstable();

    let unassigned_neighbors: Vec<VariableId> = grid
        .neighbors(variable_id)
        .iter()
        .copied()
        .filter(|&neighbor_id| !assignment.is_assigned(neighbor_id))
        .collect();

    candidates.sort_by_cached_key(|&word_id| {
        let word = word_list.get_word(word_id);

        unassigned_neighbors
            .iter()
            .map(|&neighbor_id| {
                let (i, j) = grid
                    .overlap(variable_id, neighbor_id)
                    .expect("neighbors must overlap");
                let glyph = word.glyphs[i];

                // Count the neighbor's candidates that disagree on the shared letter.
                domains
                    .get(neighbor_id)
                    .iter()
                    .filter(|&&option_id| word_list.get_word(option_id).glyphs[j] != glyph)
                    .count()
            })
            .sum::<usize>()
    });

    candidates
}

/// Depth-first search for a complete, consistent assignment. Returns true iff one was found, in
/// which case `assignment` holds it; on false, `assignment` is left as it was passed in.
pub fn backtrack(
    grid: &Grid,
    word_list: &WordList,
    domains: &DomainStore,
    assignment: &mut Assignment,
    statistics: &mut Statistics,
) -> bool {
    if assignment.is_complete() {
        return true;
    }

    let variable_id = select_unassigned_variable(grid, domains, assignment)
        .expect("incomplete assignment must have an unassigned variable");

    for word_id in order_domain_values(grid, word_list, domains, assignment, variable_id) {
        statistics.states += 1;

        assignment.set(variable_id, word_id);

        if consistent(grid, word_list, assignment)
            && backtrack(grid, word_list, domains, assignment, statistics)
        {
            return true;
        }

        // Undo on backtrack; the next candidate starts from the same partial assignment.
        assignment.clear(variable_id);
        statistics.backtracks += 1;
    }

    false
}

/// Solve the whole CSP: enforce node consistency, establish arc consistency, then run the
/// backtracking search over the filtered domains. Returns the first complete assignment found,
/// or `SolveFailure::Unsatisfiable` once either propagation or the search has proven that none
/// exists. A grid with zero variables solves trivially with no choices.
pub fn solve(grid: &Grid, word_list: &WordList) -> Result<Solution, SolveFailure> {
    let start = Instant::now();
    let mut statistics = Statistics::default();

    let mut domains = DomainStore::new(grid, word_list);
    statistics.node_consistency_eliminations = domains.enforce_node_consistency(grid);

    let size_before_ac3 = domains.total_size();
    if !ac3(grid, word_list, &mut domains, None) {
        return Err(SolveFailure::Unsatisfiable);
    }
    statistics.arc_consistency_eliminations = size_before_ac3 - domains.total_size();

    if LOG_SOLVE_PROCESS {
        println!(
            "propagation removed {} candidates ({} unary, {} binary); {} remain",
            statistics.node_consistency_eliminations + statistics.arc_consistency_eliminations,
            statistics.node_consistency_eliminations,
            statistics.arc_consistency_eliminations,
            domains.total_size(),
        );
    }

    let mut assignment = Assignment::new(grid.variables.len());
    if !backtrack(grid, word_list, &domains, &mut assignment, &mut statistics) {
        return Err(SolveFailure::Unsatisfiable);
    }

    if CHECK_INVARIANTS && !consistent(grid, word_list, &assignment) {
        panic!("complete assignment failed the consistency recheck?");
    }

    statistics.total_time = start.elapsed();

    if LOG_SOLVE_PROCESS {
        println!(
            "solved in {:?} after {} states and {} backtracks",
            statistics.total_time, statistics.states, statistics.backtracks,
        );
    }

    let choices = assignment
        .iter_assigned()
        .map(|(variable_id, word_id)| Choice {
            variable_id,
            word_id,
        })
        .collect();

    Ok(Solution {
        choices,
        statistics,
    })
}
