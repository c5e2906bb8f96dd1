//! Turning a solved grid into output for the surrounding system: a 2D letter grid, a text
//! rendering for the terminal, and an SVG export.

use std::fmt::Write;

use crate::backtracking_search::Choice;
use crate::grid::Grid;
use crate::word_list::WordList;

/// The rendered size of one cell in the SVG export, in user units.
const CELL_SIZE: usize = 100;

/// The inset between a cell's outline and its white interior.
const CELL_BORDER: usize = 2;

/// Build a 2D array of the letters placed by the given choices, in row-major order. `None`
/// represents a block or an unfilled cell.
#[must_use]
pub fn letter_grid(grid: &Grid, word_list: &WordList, choices: &[Choice]) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; grid.width]; grid.height];

    for choice in choices {
        let variable = &grid.variables[choice.variable_id];
        let word = word_list.get_word(choice.word_id);

        for (cell_idx, (x, y)) in variable.cell_coords().into_iter().enumerate() {
            letters[y][x] = Some(word_list.glyphs[word.glyphs[cell_idx]]);
        }
    }

    letters
}

/// Turn the given grid and choices into a rendered string, with `#` for blocks and `.` for any
/// fillable cell no choice covers.
#[must_use]
pub fn render_grid(grid: &Grid, word_list: &WordList, choices: &[Choice]) -> String {
    let letters = letter_grid(grid, word_list, choices);

    (0..grid.height)
        .map(|y| {
            (0..grid.width)
                .map(|x| {
                    if grid.is_fillable((x, y)) {
                        letters[y][x].unwrap_or('.')
                    } else {
                        '#'
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn the given grid and choices into an SVG document: black blocks, white cells, centered
/// letters.
#[must_use]
pub fn render_grid_svg(grid: &Grid, word_list: &WordList, choices: &[Choice]) -> String {
    let letters = letter_grid(grid, word_list, choices);
    let (width, height) = (grid.width * CELL_SIZE, grid.height * CELL_SIZE);

    let mut svg = String::new();

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
    )
    .expect("writing to a string can't fail");
    writeln!(svg, r#"<rect width="{width}" height="{height}" fill="black"/>"#)
        .expect("writing to a string can't fail");

    for y in 0..grid.height {
        for x in 0..grid.width {
            if !grid.is_fillable((x, y)) {
                continue;
            }

            writeln!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="white"/>"#,
                x * CELL_SIZE + CELL_BORDER,
                y * CELL_SIZE + CELL_BORDER,
                CELL_SIZE - 2 * CELL_BORDER,
                CELL_SIZE - 2 * CELL_BORDER,
            )
            .expect("writing to a string can't fail");

            if let Some(letter) = letters[y][x] {
                writeln!(
                    svg,
                    r#"<text x="{}" y="{}" font-family="sans-serif" font-size="64" text-anchor="middle" fill="black">{}</text>"#,
                    x * CELL_SIZE + CELL_SIZE / 2,
                    y * CELL_SIZE + CELL_SIZE * 7 / 10,
                    letter,
                )
                .expect("writing to a string can't fail");
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use crate::backtracking_search::Choice;
    use crate::grid::Grid;
    use crate::render::{letter_grid, render_grid, render_grid_svg};
    use crate::word_list::tests::memory_word_list;

    fn scenario() -> (Grid, crate::word_list::WordList, Vec<Choice>) {
        let grid = Grid::parse(
            "
            ...
            .##
            .##
            ",
        );
        let word_list = memory_word_list(&["cat", "cow"]);

        let choices = vec![
            Choice {
                variable_id: 0,
                word_id: word_list.word_id_by_string["cat"],
            },
            Choice {
                variable_id: 1,
                word_id: word_list.word_id_by_string["cow"],
            },
        ];

        (grid, word_list, choices)
    }

    #[test]
    fn test_letter_grid_places_words_by_direction() {
        let (grid, word_list, choices) = scenario();
        let letters = letter_grid(&grid, &word_list, &choices);

        assert_eq!(letters[0], vec![Some('c'), Some('a'), Some('t')]);
        assert_eq!(letters[1][0], Some('o'));
        assert_eq!(letters[2][0], Some('w'));
        assert_eq!(letters[1][1], None);
    }

    #[test]
    fn test_render_grid() {
        let (grid, word_list, choices) = scenario();

        assert_eq!(render_grid(&grid, &word_list, &choices), "cat\no##\nw##");
    }

    #[test]
    fn test_render_grid_marks_unfilled_cells() {
        let (grid, word_list, _) = scenario();

        assert_eq!(render_grid(&grid, &word_list, &[]), "...\n.##\n.##");
    }

    #[test]
    fn test_render_grid_svg() {
        let (grid, word_list, choices) = scenario();
        let svg = render_grid_svg(&grid, &word_list, &choices);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));

        // One background rect plus one per fillable cell; one text element per placed letter.
        assert_eq!(svg.matches("<rect").count(), 1 + 5);
        assert_eq!(svg.matches("<text").count(), 5);
        assert!(svg.contains(">c</text>"));
    }
}
