//! Active character sets and the add/remove token parser.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AsciiArtError, Result};

/// Default active characters: the ten decimal digits.
pub const DEFAULT_CHARSET: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// First printable ASCII character (space).
pub const PRINTABLE_START: char = ' ';
/// Last printable ASCII character (tilde).
pub const PRINTABLE_END: char = '~';

/// Keyword selecting every printable ASCII character.
const ALL_KEYWORD: &str = "all";
/// Keyword selecting the space character.
const SPACE_KEYWORD: &str = "space";

/// A mutable set of distinct characters used for matching.
///
/// Iteration is always in ascending code-point order, which also makes the
/// set's content usable directly as a cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CharacterSet {
    chars: BTreeSet<char>,
}

impl CharacterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character. Returns `true` if it was not already present.
    pub fn add(&mut self, c: char) -> bool {
        self.chars.insert(c)
    }

    /// Remove a character. Returns `true` if it was present.
    pub fn remove(&mut self, c: char) -> bool {
        self.chars.remove(&c)
    }

    /// Insert every character in `chars`.
    pub fn extend(&mut self, chars: impl IntoIterator<Item = char>) {
        self.chars.extend(chars);
    }

    /// Remove every character in `chars`.
    pub fn remove_all(&mut self, chars: impl IntoIterator<Item = char>) {
        for c in chars {
            self.chars.remove(&c);
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Characters in ascending code-point order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Sorted distinct content of the set.
    pub fn to_sorted_vec(&self) -> Vec<char> {
        self.iter().collect()
    }

    /// Apply a parsed add/remove token.
    ///
    /// The token is parsed before anything is changed, so an invalid token
    /// leaves the set untouched.
    pub fn apply(&mut self, edit: CharsetEdit, token: &str) -> Result<()> {
        let chars = parse_char_spec(token)?;
        match edit {
            CharsetEdit::Add => self.extend(chars),
            CharsetEdit::Remove => self.remove_all(chars),
        }
        Ok(())
    }
}

impl FromIterator<char> for CharacterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl From<&str> for CharacterSet {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl fmt::Display for CharacterSet {
    /// Characters in code-point order separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for c in &self.chars {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", c)?;
            first = false;
        }
        Ok(())
    }
}

/// Direction of a character-set edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetEdit {
    Add,
    Remove,
}

/// Translate an add/remove token into the characters it names.
///
/// # Parsing Rules
/// - A single character → that character
/// - `all` → every printable ASCII character (32-126)
/// - `space` → `' '`
/// - `x-y` → the inclusive ASCII range between `x` and `y`, in either order
///
/// # Errors
/// `InvalidCharacterSpec` for anything else, including ranges with a
/// non-ASCII endpoint.
pub fn parse_char_spec(token: &str) -> Result<Vec<char>> {
    let chars: Vec<char> = token.chars().collect();

    if chars.len() == 1 {
        return Ok(chars);
    }

    match token {
        ALL_KEYWORD => return Ok((PRINTABLE_START..=PRINTABLE_END).collect()),
        SPACE_KEYWORD => return Ok(vec![' ']),
        _ => {}
    }

    if let &[first, '-', last] = chars.as_slice() {
        if first.is_ascii() && last.is_ascii() {
            let (lo, hi) = if first <= last {
                (first, last)
            } else {
                (last, first)
            };
            return Ok((lo..=hi).collect());
        }
    }

    Err(AsciiArtError::InvalidCharacterSpec(token.to_string()))
}
