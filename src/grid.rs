//! This module implements the structure model for a crossword: the grid dimensions, which cells
//! are fillable, the set of variables (slots), and the overlap table between every pair of
//! variables. All of it is computed once from a template and is immutable for the lifetime of a
//! solve.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::VariableId;

/// Zero-indexed x and y coords for a cell in the grid, where y = 0 in the top row.
pub type GridCoord = (usize, usize);

/// Offsets of a shared cell within two crossing variables: the `.0`th letter of the first
/// variable's word must equal the `.1`th letter of the second variable's word.
pub type Overlap = (usize, usize);

/// The direction that a variable is facing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Across,
    Down,
}

/// A struct identifying one slot in the grid. Two variables are equal only if the start cell,
/// direction, and length all match; the full set of variables is fixed for the lifetime of a
/// solve.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Variable {
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    /// Generate the coords for each cell of this variable.
    #[must_use]
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.length)
            .map(|cell_idx| match self.direction {
                Direction::Across => (self.start_cell.0 + cell_idx, self.start_cell.1),
                Direction::Down => (self.start_cell.0, self.start_cell.1 + cell_idx),
            })
            .collect()
    }

    /// Parse a string like "1,2,down,5" into a `Variable` struct.
    pub fn from_key(key: &str) -> Result<Variable, String> {
        let key_parts: Vec<&str> = key.split(',').collect();
        if key_parts.len() != 4 {
            return Err(format!("invalid variable key: {key}"));
        }

        let x: Result<usize, _> = key_parts[0].parse();
        let y: Result<usize, _> = key_parts[1].parse();
        let direction: Option<Direction> = match key_parts[2] {
            "across" => Some(Direction::Across),
            "down" => Some(Direction::Down),
            _ => None,
        };
        let length: Result<usize, _> = key_parts[3].parse();

        if let (Ok(x), Ok(y), Some(direction), Ok(length)) = (x, y, direction, length) {
            Ok(Variable {
                start_cell: (x, y),
                direction,
                length,
            })
        } else {
            Err(format!("invalid variable key: {key:?}"))
        }
    }

    /// Represent this variable as a string like "1,2,down,5".
    #[must_use]
    pub fn to_key(&self) -> String {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        format!(
            "{},{},{},{}",
            self.start_cell.0, self.start_cell.1, direction, self.length,
        )
    }
}

/// Serialize a `Variable` into a string key.
#[cfg(feature = "serde")]
impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_key())
    }
}

/// Deserialize a `Variable` from a string key.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_string = String::deserialize(deserializer)?;
        Variable::from_key(&raw_string).map_err(serde::de::Error::custom)
    }
}

/// A struct holding everything the solver needs to know about a grid's geometry: dimensions,
/// fillable cells, variables, and the precomputed overlap table and neighbor lists.
#[derive(Debug, Clone)]
pub struct Grid {
    /// The width and height of the grid.
    pub width: usize,
    pub height: usize,

    /// A flat array of cell flags in row-major order; `true` means the cell is fillable.
    pub fillable: Vec<bool>,

    /// All variables in the grid, in discovery order (across slots first, then down slots).
    pub variables: Vec<Variable>,

    /// `overlaps[x][y]` holds the offsets of the shared cell between variables `x` and `y`, or
    /// `None` if they don't cross. Symmetric: if `overlaps[x][y]` is `(i, j)` then
    /// `overlaps[y][x]` is `(j, i)`.
    pub overlaps: Vec<Vec<Option<Overlap>>>,

    /// For each variable, the ids of every variable it crosses.
    neighbors: Vec<Vec<VariableId>>,
}

impl Grid {
    /// Parse a template string with `.` representing fillable cells and any other character
    /// representing a block. Rows shorter than the widest row are padded with blocks.
    #[must_use]
    pub fn parse(template: &str) -> Grid {
        let rows: Vec<Vec<char>> = template
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(line.chars().collect())
                }
            })
            .collect();

        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut fillable = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                fillable[y * width + x] = cell == '.';
            }
        }

        let variables = find_variables(&fillable, width, height);
        let (overlaps, neighbors) = build_overlap_table(&variables);

        Grid {
            width,
            height,
            fillable,
            variables,
            overlaps,
            neighbors,
        }
    }

    /// Is the given cell fillable (i.e., not a block and within bounds)?
    #[must_use]
    pub fn is_fillable(&self, (x, y): GridCoord) -> bool {
        x < self.width && y < self.height && self.fillable[y * self.width + x]
    }

    /// The overlap between two variables, if they cross.
    #[must_use]
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        self.overlaps[x][y]
    }

    /// The ids of every variable crossing the given one.
    #[must_use]
    pub fn neighbors(&self, variable_id: VariableId) -> &[VariableId] {
        &self.neighbors[variable_id]
    }

    /// The number of variables crossing the given one.
    #[must_use]
    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.neighbors[variable_id].len()
    }
}

/// Identify the variables in a grid of cell flags: every maximal horizontal or vertical run of at
/// least two fillable cells.
fn find_variables(fillable: &[bool], width: usize, height: usize) -> Vec<Variable> {
    let at = |x: usize, y: usize| fillable[y * width + x];
    let mut variables = vec![];

    for y in 0..height {
        let mut x = 0;
        while x < width {
            if at(x, y) && (x == 0 || !at(x - 1, y)) {
                let mut length = 1;
                while x + length < width && at(x + length, y) {
                    length += 1;
                }
                if length > 1 {
                    variables.push(Variable {
                        start_cell: (x, y),
                        direction: Direction::Across,
                        length,
                    });
                }
                x += length;
            } else {
                x += 1;
            }
        }
    }

    for x in 0..width {
        let mut y = 0;
        while y < height {
            if at(x, y) && (y == 0 || !at(x, y - 1)) {
                let mut length = 1;
                while y + length < height && at(x, y + length) {
                    length += 1;
                }
                if length > 1 {
                    variables.push(Variable {
                        start_cell: (x, y),
                        direction: Direction::Down,
                        length,
                    });
                }
                y += length;
            } else {
                y += 1;
            }
        }
    }

    variables
}

/// Build the pairwise overlap table and neighbor lists by mapping each cell to the variables
/// covering it. The grid topology is 2D, so each cell is covered by at most one variable per
/// direction.
fn build_overlap_table(
    variables: &[Variable],
) -> (Vec<Vec<Option<Overlap>>>, Vec<Vec<VariableId>>) {
    let mut overlaps = vec![vec![None; variables.len()]; variables.len()];

    let mut entries_by_coord: HashMap<GridCoord, Vec<(VariableId, usize)>> = HashMap::new();
    for (variable_id, variable) in variables.iter().enumerate() {
        for (cell_idx, coord) in variable.cell_coords().into_iter().enumerate() {
            entries_by_coord
                .entry(coord)
                .or_default()
                .push((variable_id, cell_idx));
        }
    }

    for entries in entries_by_coord.values() {
        if entries.len() > 2 {
            panic!("More than two variables crossing in cell?");
        }
        if let [(a, a_cell), (b, b_cell)] = entries[..] {
            overlaps[a][b] = Some((a_cell, b_cell));
            overlaps[b][a] = Some((b_cell, a_cell));
        }
    }

    let neighbors = (0..variables.len())
        .map(|x| {
            (0..variables.len())
                .filter(|&y| overlaps[x][y].is_some())
                .collect()
        })
        .collect();

    (overlaps, neighbors)
}

#[cfg(test)]
mod tests {
    use crate::grid::{Direction, Grid, Variable};

    #[test]
    fn test_parse_open_square() {
        let grid = Grid::parse(
            "
            ...
            ...
            ...
            ",
        );

        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 3);
        assert_eq!(grid.variables.len(), 6);
        assert!(grid
            .variables
            .iter()
            .all(|variable| variable.length == 3));
        assert_eq!(
            grid.variables
                .iter()
                .filter(|variable| variable.direction == Direction::Across)
                .count(),
            3
        );
    }

    #[test]
    fn test_parse_skips_short_runs() {
        let grid = Grid::parse(
            "
            ..
            .#
            ",
        );

        assert_eq!(
            grid.variables,
            vec![
                Variable {
                    start_cell: (0, 0),
                    direction: Direction::Across,
                    length: 2,
                },
                Variable {
                    start_cell: (0, 0),
                    direction: Direction::Down,
                    length: 2,
                },
            ]
        );
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let grid = Grid::parse(
            "
            ...
            .
            ",
        );

        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 2);
        assert!(!grid.is_fillable((1, 1)));
        assert!(!grid.is_fillable((2, 1)));
        assert_eq!(grid.variables.len(), 2);
    }

    #[test]
    fn test_overlaps_are_symmetric() {
        let grid = Grid::parse(
            "
            ...
            .##
            .##
            ",
        );

        assert_eq!(grid.variables.len(), 2);
        assert_eq!(grid.overlap(0, 1), Some((0, 0)));
        assert_eq!(grid.overlap(1, 0), Some((0, 0)));

        for x in 0..grid.variables.len() {
            for y in 0..grid.variables.len() {
                if let Some((i, j)) = grid.overlap(x, y) {
                    assert_eq!(grid.overlap(y, x), Some((j, i)));
                }
            }
        }
    }

    #[test]
    fn test_neighbors_and_degree() {
        let grid = Grid::parse(
            "
            ...
            ...
            ...
            ",
        );

        // Every across variable crosses every down variable and vice versa.
        for variable_id in 0..grid.variables.len() {
            assert_eq!(grid.degree(variable_id), 3);
            for &neighbor_id in grid.neighbors(variable_id) {
                assert_ne!(
                    grid.variables[variable_id].direction,
                    grid.variables[neighbor_id].direction
                );
            }
        }
    }

    #[test]
    fn test_parse_all_blocks() {
        let grid = Grid::parse(
            "
            ##
            ##
            ",
        );

        assert!(grid.variables.is_empty());
    }

    #[test]
    fn test_variable_key_round_trip() {
        let variable = Variable {
            start_cell: (1, 2),
            direction: Direction::Down,
            length: 5,
        };

        assert_eq!(variable.to_key(), "1,2,down,5");
        assert_eq!(Variable::from_key("1,2,down,5").unwrap(), variable);
        assert!(Variable::from_key("1,2,sideways,5").is_err());
        assert!(Variable::from_key("1,2,down").is_err());
    }
}
