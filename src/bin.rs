use clap::Parser;
use crossgen::backtracking_search::solve;
use crossgen::grid::Grid;
use crossgen::render::{render_grid, render_grid_svg};
use crossgen::word_list::{WordList, WordListSourceConfig};
use std::fmt::{Debug, Formatter};
use std::fs;

/// crossgen: Command-line crossword generation tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the grid structure file, as ASCII with . representing fillable squares and #
    /// representing blocks
    structure_path: String,

    /// Path to a word list file with one candidate word per line
    words_path: String,

    /// Path to write an SVG rendering of the solved grid
    #[arg(long)]
    output: Option<String>,
}

struct Error(String);

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0) // Print error unquoted
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let raw_grid_content = fs::read_to_string(&args.structure_path)
        .map_err(|_| Error(format!("Couldn't read file '{}'", args.structure_path)))?;

    let grid = Grid::parse(&raw_grid_content);

    if grid.height == 0 {
        return Err(Error("Grid must have at least one row".into()));
    }

    let max_side = grid.width.max(grid.height);

    let word_list = WordList::new(
        vec![WordListSourceConfig::File {
            path: args.words_path.into(),
        }],
        Some(max_side),
    );

    #[allow(clippy::comparison_chain)]
    if word_list.errors.len() == 1 {
        return Err(Error(format!("{}", word_list.errors[0])));
    } else if word_list.errors.len() > 1 {
        let mut full_error: String = "".into();
        for error in &word_list.errors {
            full_error.push_str(&format!("\n- {error}"));
        }
        return Err(Error(full_error));
    }

    if word_list.word_count() == 0 {
        return Err(Error("Word list is empty".into()));
    }

    match solve(&grid, &word_list) {
        Ok(solution) => {
            println!("{}", render_grid(&grid, &word_list, &solution.choices));

            if let Some(output_path) = args.output {
                let svg = render_grid_svg(&grid, &word_list, &solution.choices);
                fs::write(&output_path, svg)
                    .map_err(|_| Error(format!("Couldn't write file '{output_path}'")))?;
            }
        }
        Err(_) => println!("No solution."),
    }

    Ok(())
}
