/// An identifier for a letter or symbol, given by its index in the `WordList`'s `glyphs` field.
pub type GlyphId = usize;

/// An identifier for a word within its length bucket in the `WordList`'s `words` field.
pub type WordId = usize;

/// A word identifier that is unique across buckets: the word's length plus its `WordId`.
pub type GlobalWordId = (usize, WordId);

/// An identifier for a variable (slot), given by its index in the `Grid`'s `variables` field.
pub type VariableId = usize;
