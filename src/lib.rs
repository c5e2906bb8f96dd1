pub mod arc_consistency;
pub mod backtracking_search;
pub mod domains;
pub mod grid;
pub mod render;
pub mod types;
pub mod word_list;

pub const LOG_SOLVE_PROCESS: bool = cfg!(feature = "log_solve_process");
pub const CHECK_INVARIANTS: bool = cfg!(feature = "check_invariants");

/// The expected maximum number of distinct characters appearing in a word list.
pub const MAX_GLYPH_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;
