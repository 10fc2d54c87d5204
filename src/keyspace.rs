//! Candidate formats and the odometer that walks them.

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::ops::RangeInclusive;

use crate::error::{CrackError, Result};

/// An ordered, non-empty set of symbols allowed at one position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterClass {
    symbols: Vec<String>,
}

impl CharacterClass {
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();

        if symbols.is_empty() {
            return Err(CrackError::config("character class must not be empty"));
        }
        if symbols.iter().any(String::is_empty) {
            return Err(CrackError::config(
                "character class must not contain an empty symbol",
            ));
        }

        // Equal widths keep concatenated candidates unambiguous.
        let width = symbols[0].chars().count();
        if let Some(odd) = symbols.iter().find(|s| s.chars().count() != width) {
            return Err(CrackError::config(format!(
                "symbol '{odd}' differs in width from '{}'",
                symbols[0]
            )));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(dup) = symbols.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(CrackError::config(format!(
                "symbol '{dup}' appears more than once"
            )));
        }

        Ok(Self { symbols })
    }

    /// One symbol per character of an inclusive range, e.g. `'A'..='Z'`.
    pub fn chars(range: RangeInclusive<char>) -> Result<Self> {
        Self::new(range.map(String::from))
    }

    /// Zero-padded decimal symbols, e.g. `0..=99` at width 2 gives `"00"` through `"99"`.
    pub fn numeric(range: RangeInclusive<u32>, width: usize) -> Result<Self> {
        Self::new(range.map(|n| format!("{n:0width$}")))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, index: usize) -> &str {
        &self.symbols[index]
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

impl Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.symbols.as_slice() {
            [only] => f.write_str(only),
            [first, .., last] => write!(f, "[{first}-{last}]"),
            [] => Ok(()),
        }
    }
}

/// The shape of every candidate: one character class per position.
///
/// Position 0 varies slowest, the last position fastest. The keyspace size is
/// computed once at construction and the format is immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateFormat {
    classes: Vec<CharacterClass>,
    len: u64,
}

impl CandidateFormat {
    pub fn new(classes: Vec<CharacterClass>) -> Result<Self> {
        if classes.is_empty() {
            return Err(CrackError::config(
                "candidate format must have at least one position",
            ));
        }

        let len = classes.iter().try_fold(1u64, |acc, class| {
            if class.is_empty() {
                return Err(CrackError::config("character class must not be empty"));
            }
            acc.checked_mul(class.len() as u64)
                .ok_or_else(|| CrackError::config("keyspace size overflows u64"))
        })?;

        Ok(Self { classes, len })
    }

    /// Three uppercase letters followed by a two digit number, `AAA00` through `ZZZ99`.
    pub fn az99() -> Result<Self> {
        let letters = CharacterClass::chars('A'..='Z')?;
        Self::new(vec![
            letters.clone(),
            letters.clone(),
            letters,
            CharacterClass::numeric(0..=99, 2)?,
        ])
    }

    /// Parses a hashcat-style mask.
    ///
    /// `?u`, `?l` and `?d` expand to uppercase letters, lowercase letters and
    /// digits; `??` is a literal `?`; every other character is a fixed position.
    pub fn parse_mask(mask: &str) -> Result<Self> {
        let mut classes = Vec::new();
        let mut chars = mask.chars();

        while let Some(c) = chars.next() {
            let class = if c == '?' {
                match chars.next() {
                    Some('u') => CharacterClass::chars('A'..='Z')?,
                    Some('l') => CharacterClass::chars('a'..='z')?,
                    Some('d') => CharacterClass::chars('0'..='9')?,
                    Some('?') => CharacterClass::new(["?"])?,
                    Some(other) => {
                        return Err(CrackError::config(format!(
                            "unknown mask token '?{other}' in '{mask}'"
                        )))
                    }
                    None => {
                        return Err(CrackError::config(format!(
                            "mask '{mask}' ends with a dangling '?'"
                        )))
                    }
                }
            } else {
                CharacterClass::new([c.to_string()])?
            };
            classes.push(class);
        }

        Self::new(classes)
    }

    /// Number of candidates in the keyspace.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn positions(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[CharacterClass] {
        &self.classes
    }

    /// Maps a 0-based index to its candidate by mixed-radix decomposition.
    pub fn candidate_at(&self, index: u64) -> Option<String> {
        if index >= self.len {
            return None;
        }

        let mut rest = index;
        let mut digits = vec![0usize; self.classes.len()];
        for (digit, class) in digits.iter_mut().zip(&self.classes).rev() {
            let radix = class.len() as u64;
            *digit = (rest % radix) as usize;
            rest /= radix;
        }

        Some(
            self.classes
                .iter()
                .zip(digits)
                .map(|(class, digit)| class.symbol(digit))
                .collect(),
        )
    }

    /// A fresh odometer positioned before the first candidate.
    pub fn keyspace(&self) -> Keyspace<'_> {
        Keyspace::new(self)
    }

    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            keyspace: self.keyspace(),
        }
    }
}

impl Display for CandidateFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for class in &self.classes {
            class.fmt(f)?;
        }
        Ok(())
    }
}

/// Odometer over a [`CandidateFormat`].
///
/// The current candidate lives in a reused buffer; each step only rewrites the
/// positions that changed.
pub struct Keyspace<'f> {
    format: &'f CandidateFormat,
    /// The current candidate.
    value: String,
    /// Symbol index per position for the current value.
    indexes: Vec<usize>,
    /// Byte offset of each position's symbol inside `value`.
    offsets: Vec<usize>,
    /// 1-based index of the current value, 0 before the first step.
    position: u64,
    started: bool,
    exhausted: bool,
}

impl<'f> Keyspace<'f> {
    fn new(format: &'f CandidateFormat) -> Self {
        let positions = format.positions();
        Self {
            format,
            value: String::new(),
            indexes: vec![0; positions],
            offsets: vec![0; positions],
            position: 0,
            started: false,
            exhausted: false,
        }
    }

    /// Moves to the next candidate and returns it, or `None` once the
    /// outermost position has wrapped.
    pub fn advance(&mut self) -> Option<&str> {
        if !self.started {
            self.started = true;
            self.rebuild_from(0);
            self.position = 1;
            return Some(self.value.as_str());
        }
        if self.exhausted {
            return None;
        }

        let format = self.format;
        let mut i = self.indexes.len();
        while i > 0 {
            i -= 1;
            if self.indexes[i] + 1 == format.classes[i].len() {
                self.indexes[i] = 0;
            } else {
                self.indexes[i] += 1;
                self.rebuild_from(i);
                self.position += 1;
                return Some(self.value.as_str());
            }
        }

        self.exhausted = true;
        None
    }

    /// Rewinds to the state before the first candidate.
    pub fn reset(&mut self) {
        self.value.clear();
        self.indexes.iter_mut().for_each(|i| *i = 0);
        self.offsets.iter_mut().for_each(|o| *o = 0);
        self.position = 0;
        self.started = false;
        self.exhausted = false;
    }

    /// 1-based index of the current candidate.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn current(&self) -> Option<&str> {
        (self.started && !self.exhausted).then_some(self.value.as_str())
    }

    pub fn format(&self) -> &'f CandidateFormat {
        self.format
    }

    fn rebuild_from(&mut self, first: usize) {
        let format = self.format;
        self.value.truncate(self.offsets[first]);
        for position in first..self.indexes.len() {
            self.offsets[position] = self.value.len();
            self.value
                .push_str(format.classes[position].symbol(self.indexes[position]));
        }
    }
}

/// Owned candidates in odometer order.
pub struct Candidates<'f> {
    keyspace: Keyspace<'f>,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.keyspace.advance().map(str::to_owned)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.keyspace.format.len() - self.keyspace.position();
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
