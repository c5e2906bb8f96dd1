//! This module contains a crossword-specific implementation of the AC-3 algorithm for
//! establishing arc consistency. For our purposes, the grid is arc-consistent when every word
//! remaining in a variable's domain has, for each crossing variable, at least one word in that
//! variable's domain agreeing with it on the shared letter. We keep applying that rule over a
//! worklist of directed arcs until no more eliminations are possible, or until some domain is
//! emptied -- which proves the grid unsolvable under the current domains.

use std::collections::VecDeque;

use crate::domains::DomainStore;
use crate::grid::Grid;
use crate::types::VariableId;
use crate::word_list::WordList;

/// A directed arc: revising `(x, y)` makes `x` consistent with `y`.
pub type Arc = (VariableId, VariableId);

/// Make variable `x` arc-consistent with variable `y` by removing every word from `x`'s domain
/// that has no agreeing partner in `y`'s domain. Returns whether anything was removed.
///
/// Callers must have enforced node consistency first, so that every domain word has its
/// variable's length.
pub fn revise(
    grid: &Grid,
    word_list: &WordList,
    domains: &mut DomainStore,
    x: VariableId,
    y: VariableId,
) -> bool {
    let Some((x_cell, y_cell)) = grid.overlap(x, y) else {
        return false;
    };

    let mut revised = false;

    // The domain is mutated during the pass, so iterate over a snapshot taken up front.
    for x_word_id in domains.snapshot(x) {
        let x_glyph = word_list.get_word(x_word_id).glyphs[x_cell];

        let supported = domains
            .get(y)
            .iter()
            .any(|&y_word_id| word_list.get_word(y_word_id).glyphs[y_cell] == x_glyph);

        if !supported {
            domains.remove(x, x_word_id);
            revised = true;
        }
    }

    revised
}

/// Process a worklist of directed arcs until the whole grid is arc-consistent or some variable's
/// domain is emptied. If `arcs` is `None`, start from every ordered pair of distinct variables.
///
/// Whenever revising `(x, y)` removes something from `x`'s domain, the arcs `(z, x)` for every
/// neighbor `z` of `x` other than `y` are re-enqueued, since the removal may have invalidated
/// `z`'s consistency with `x`. Each revision strictly shrinks a finite domain, so the worklist
/// always drains.
///
/// Returns false iff a domain was emptied, meaning no solution exists under the current domains.
pub fn ac3(
    grid: &Grid,
    word_list: &WordList,
    domains: &mut DomainStore,
    arcs: Option<Vec<Arc>>,
) -> bool {
    let mut queue: VecDeque<Arc> = match arcs {
        Some(arcs) => arcs.into_iter().collect(),
        None => (0..grid.variables.len())
            .flat_map(|x| {
                (0..grid.variables.len())
                    .filter(move |&y| y != x)
                    .map(move |y| (x, y))
            })
            .collect(),
    };

    while let Some((x, y)) = queue.pop_front() {
        if revise(grid, word_list, domains, x, y) {
            if domains.is_empty(x) {
                return false;
            }

            for &z in grid.neighbors(x) {
                if z != y {
                    queue.push_back((z, x));
                }
            }
        }
    }

    true
}
