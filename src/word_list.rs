use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;
use std::ffi::OsString;
use std::{fmt, fs};
use unicode_normalization::UnicodeNormalization;

use crate::types::{GlobalWordId, GlyphId};
use crate::{MAX_GLYPH_COUNT, MAX_SLOT_LENGTH};

/// A struct representing a single candidate word.
#[derive(Debug, Clone)]
pub struct Word {
    /// The word as it would appear in a grid -- lowercase letters or other valid glyphs, no
    /// whitespace.
    pub normalized_string: String,

    /// The glyph ids making up `normalized_string`.
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

/// Given a raw entry from a word list, turn it into the normalized form used everywhere in the
/// solver.
#[must_use]
pub fn normalize_word(raw: &str) -> String {
    raw.to_lowercase()
        .nfc() // Normalize Unicode combining forms
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[derive(Debug, Clone)]
pub enum WordListError {
    InvalidPath(String),
    InvalidWord(String),
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            WordListError::InvalidPath(path) => format!("Can’t read file: “{path}”"),
            WordListError::InvalidWord(word) => {
                format!("Word list contains invalid word: “{word}”")
            }
        };
        write!(f, "{string}")
    }
}

/// Configuration describing a source of word list entries.
pub enum WordListSourceConfig {
    Memory { words: Vec<String> },
    File { path: OsString },
    FileContents { contents: &'static str },
}

fn parse_word_list_contents(contents: &str, errors: &mut Vec<WordListError>) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }

            let normalized = normalize_word(line);
            if normalized.is_empty() {
                errors.push(WordListError::InvalidWord(line.into()));
                return None;
            }

            Some(normalized)
        })
        .collect()
}

fn load_words_from_source(
    source: &WordListSourceConfig,
    errors: &mut Vec<WordListError>,
) -> Vec<String> {
    match source {
        WordListSourceConfig::Memory { words } => words
            .iter()
            .filter_map(|raw| {
                let normalized = normalize_word(raw);
                if normalized.is_empty() {
                    errors.push(WordListError::InvalidWord(raw.clone()));
                    return None;
                }
                Some(normalized)
            })
            .collect(),

        WordListSourceConfig::File { path } => {
            if let Ok(contents) = fs::read_to_string(path) {
                parse_word_list_contents(&contents, errors)
            } else {
                errors.push(WordListError::InvalidPath(path.to_string_lossy().into()));
                vec![]
            }
        }

        WordListSourceConfig::FileContents { contents } => {
            parse_word_list_contents(contents, errors)
        }
    }
}

/// A struct representing the currently-loaded word list(s). This is static regardless of grid
/// geometry or our progress through a solve, although we do configure a `max_length` that depends
/// on the size of the grid, since it helps performance to avoid loading words that are too long to
/// be usable.
pub struct WordList {
    /// A list of all characters that occur in any (normalized) word. `GlyphId`s used everywhere
    /// else are indices into this list.
    pub glyphs: SmallVec<[char; MAX_GLYPH_COUNT]>,

    /// The inverse of `glyphs`: a map from a character to the `GlyphId` representing it.
    pub glyph_id_by_char: HashMap<char, GlyphId>,

    /// All loaded words, bucketed by length. An index into `words` is the length of the words in
    /// the bucket, so `words[0]` is always an empty vec.
    pub words: Vec<Vec<Word>>,

    /// A map from a normalized string to the id of the `Word` representing it.
    pub word_id_by_string: HashMap<String, GlobalWordId>,

    /// The maximum word length provided when configuring the list, if any.
    pub max_length: Option<usize>,

    /// Errors encountered while loading the sources, in input order.
    pub errors: Vec<WordListError>,
}

impl WordList {
    /// Construct a new `WordList` from the given sources, skipping entries longer than
    /// `max_length` and duplicate entries after normalization.
    #[must_use]
    pub fn new(sources: Vec<WordListSourceConfig>, max_length: Option<usize>) -> WordList {
        let mut instance = WordList {
            glyphs: smallvec![],
            glyph_id_by_char: HashMap::new(),
            words: vec![vec![]],
            word_id_by_string: HashMap::new(),
            max_length,
            errors: vec![],
        };

        for source in &sources {
            let mut errors = vec![];
            let normalized_words = load_words_from_source(source, &mut errors);
            instance.errors.extend(errors);

            for normalized in normalized_words {
                let length = normalized.chars().count();
                if max_length.map_or(false, |max_length| length > max_length) {
                    continue;
                }
                if instance.word_id_by_string.contains_key(&normalized) {
                    continue;
                }
                instance.add_word(&normalized);
            }
        }

        instance
    }

    /// Add the given normalized word to the list. The word must not be part of the list yet.
    fn add_word(&mut self, normalized: &str) -> GlobalWordId {
        let glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]> = normalized
            .chars()
            .map(|c| self.glyph_id_for_char(c))
            .collect();

        let word_length = glyphs.len();

        while self.words.len() < word_length + 1 {
            self.words.push(vec![]);
        }

        let word_id = self.words[word_length].len();

        self.words[word_length].push(Word {
            normalized_string: normalized.to_string(),
            glyphs,
        });

        self.word_id_by_string
            .insert(normalized.to_string(), (word_length, word_id));

        (word_length, word_id)
    }

    /// Borrow an existing word using its global id.
    #[must_use]
    pub fn get_word(&self, global_word_id: GlobalWordId) -> &Word {
        &self.words[global_word_id.0][global_word_id.1]
    }

    /// The total number of words across all length buckets.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.iter().map(Vec::len).sum()
    }

    /// What's the unique glyph id for the given char? We do this lazily, instead of mapping every
    /// letter up front, because word list entries may also contain numbers, non-English letters,
    /// or punctuation.
    pub fn glyph_id_for_char(&mut self, ch: char) -> GlyphId {
        self.glyph_id_by_char.get(&ch).copied().unwrap_or_else(|| {
            self.glyphs.push(ch);
            let id = self.glyphs.len() - 1;
            self.glyph_id_by_char.insert(ch, id);
            id
        })
    }
}

impl fmt::Debug for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordList")
            .field("glyphs", &self.glyphs)
            .field(
                "words",
                &self.words.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub mod tests {
    use crate::word_list::{WordList, WordListSourceConfig};

    #[must_use]
    pub fn memory_word_list(words: &[&str]) -> WordList {
        WordList::new(
            vec![WordListSourceConfig::Memory {
                words: words.iter().map(|&word| word.into()).collect(),
            }],
            None,
        )
    }

    #[test]
    fn test_loads_words_up_to_max_length() {
        let word_list = WordList::new(
            vec![WordListSourceConfig::Memory {
                words: vec!["cat".into(), "skate".into(), "skates".into()],
            }],
            Some(5),
        );

        assert_eq!(word_list.max_length, Some(5));
        assert_eq!(word_list.words.len(), 6);

        let &global_word_id = word_list
            .word_id_by_string
            .get("skate")
            .expect("word list should include 'skate'");

        let word = word_list.get_word(global_word_id);
        assert_eq!(word.normalized_string, "skate");
        assert_eq!(word.glyphs.len(), 5);

        assert!(word_list.word_id_by_string.get("skates").is_none());
    }

    #[test]
    fn test_normalizes_and_dedups_entries() {
        let word_list = memory_word_list(&["CAT", "cat", "  Dog  ", "dog"]);

        assert_eq!(word_list.word_count(), 2);
        assert!(word_list.word_id_by_string.contains_key("cat"));
        assert!(word_list.word_id_by_string.contains_key("dog"));
        assert!(word_list.errors.is_empty());
    }

    #[test]
    #[allow(clippy::unicode_not_nfc)]
    fn test_unusual_characters() {
        let word_list = memory_word_list(&[
            // Non-English character expressed as one two-byte `char`
            "monsutâ",
            // Non-English character expressed as two chars w/ combining form
            "hélen",
        ]);

        assert_eq!(
            word_list.words.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![0, 0, 0, 0, 0, 1, 0, 1]
        );
    }

    #[test]
    fn test_records_invalid_words() {
        let word_list = memory_word_list(&["cat", "  "]);

        assert_eq!(word_list.word_count(), 1);
        assert_eq!(word_list.errors.len(), 1);
    }

    #[test]
    fn test_records_unreadable_file() {
        let word_list = WordList::new(
            vec![WordListSourceConfig::File {
                path: "/nonexistent/words.txt".into(),
            }],
            None,
        );

        assert_eq!(word_list.word_count(), 0);
        assert_eq!(word_list.errors.len(), 1);
    }

    #[test]
    fn test_loads_file_contents() {
        let word_list = WordList::new(
            vec![WordListSourceConfig::FileContents {
                contents: "cat\ndog\n\nbird\n",
            }],
            None,
        );

        assert_eq!(word_list.word_count(), 3);
        assert!(word_list.errors.is_empty());
    }
}
