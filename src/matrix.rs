//! Substitution matrices in the plain-text layout of the BLOSUM/PAM files.
//!
//! ```text
//! # comment
//!    A  R  N
//! A  4 -1 -2
//! R -1  5  0
//! N -2  0  6
//! ```
//!
//! The first significant line lists the symbols in column order. Each
//! following line starts with a row label and is read for the pairs on or
//! right of the diagonal only, so a pair is stored once. Rows may either be
//! full width (the lower-triangle values and any values past the last header
//! column are ignored) or carry only the upper-triangle values:
//!
//! ```text
//!    A  R  N
//! A  4 -1 -2
//! R     5  0
//! N        6
//! ```

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{AlignError, Result};
use crate::scoring::ScoringProvider;

/// Symmetric substitution scores keyed by unordered symbol pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    symbols: Vec<u8>,
    scores: FxHashMap<(u8, u8), i32>,
}

#[inline]
fn pair_key(a: u8, b: u8) -> (u8, u8) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn single_symbol(token: &str, line: usize) -> Result<u8> {
    match token.as_bytes() {
        [c] if c.is_ascii_graphic() => Ok(*c),
        _ => Err(AlignError::matrix(
            line,
            format!("symbol '{token}' must be a single printable ASCII character"),
        )),
    }
}

impl SubstitutionMatrix {
    /// Read and parse a matrix file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AlignError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse matrix text. See the module docs for the layout.
    ///
    /// Sequences are byte strings, so every header symbol and row label must
    /// be a single printable ASCII character. Multi-character tokens such as
    /// `Xaa` are rejected with [`AlignError::Matrix`] rather than truncated.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'));

        let (header_line, header) = lines.next().ok_or(AlignError::EmptyMatrix)?;
        let mut symbols = Vec::new();
        for token in header.split_whitespace() {
            let sym = single_symbol(token, header_line)?;
            if symbols.contains(&sym) {
                return Err(AlignError::matrix(
                    header_line,
                    format!("duplicate symbol '{}' in header", sym as char),
                ));
            }
            symbols.push(sym);
        }
        let n = symbols.len();

        let mut scores = FxHashMap::default();
        let mut row = 0usize;
        let mut last_line = header_line;

        for (line_no, line) in lines {
            last_line = line_no;
            if row == n {
                return Err(AlignError::matrix(
                    line_no,
                    format!("more rows than the {n} header symbols"),
                ));
            }

            let mut tokens = line.split_whitespace();
            let label = tokens
                .next()
                .map(|t| single_symbol(t, line_no))
                .transpose()?
                .ok_or_else(|| AlignError::matrix(line_no, "missing row label"))?;
            if label != symbols[row] {
                return Err(AlignError::matrix(
                    line_no,
                    format!(
                        "row label '{}' does not match header symbol '{}'",
                        label as char, symbols[row] as char
                    ),
                ));
            }

            let values = tokens
                .map(|t| {
                    t.parse::<i32>().map_err(|_| {
                        AlignError::matrix(line_no, format!("score '{t}' is not an integer"))
                    })
                })
                .collect::<Result<Vec<i32>>>()?;

            // Full-width rows carry at least n values; upper-triangle rows
            // carry exactly n - row.
            let upper = if values.len() >= n {
                &values[row..n]
            } else if values.len() == n - row {
                &values[..]
            } else {
                return Err(AlignError::matrix(
                    line_no,
                    format!(
                        "row '{}' has {} scores, expected {} or {}",
                        label as char,
                        values.len(),
                        n,
                        n - row
                    ),
                ));
            };

            for (&other, &score) in symbols[row..].iter().zip(upper) {
                scores.insert(pair_key(label, other), score);
            }
            row += 1;
        }

        if row < n {
            return Err(AlignError::matrix(
                last_line,
                format!(
                    "missing row for symbol '{}' ({row} of {n} rows present)",
                    symbols[row] as char
                ),
            ));
        }

        Ok(Self { symbols, scores })
    }

    /// Header symbols in column order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Substitution score for the unordered pair `{a, b}`.
    #[inline]
    pub fn get(&self, a: u8, b: u8) -> Option<i32> {
        self.scores.get(&pair_key(a, b)).copied()
    }

    /// Number of stored unordered pairs: `n * (n + 1) / 2` for `n` symbols.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl ScoringProvider for SubstitutionMatrix {
    #[inline]
    fn score(&self, a: u8, b: u8) -> Option<i32> {
        self.get(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\
# toy matrix
   A  R  N

A  4 -1 -2
R -1  5  0
N -2  0  6
";

    #[test]
    fn parses_full_width_rows() {
        let m = SubstitutionMatrix::parse(FULL).unwrap();
        assert_eq!(m.symbols(), b"ARN");
        assert_eq!(m.len(), 6);
        assert_eq!(m.get(b'A', b'A'), Some(4));
        assert_eq!(m.get(b'R', b'N'), Some(0));
        assert_eq!(m.get(b'N', b'A'), Some(-2));
        assert_eq!(m.get(b'A', b'W'), None);
    }

    #[test]
    fn parses_upper_triangle_rows() {
        let text = "A R N\nA 4 -1 -2\nR 5 0\nN 6\n";
        let tri = SubstitutionMatrix::parse(text).unwrap();
        assert_eq!(tri, SubstitutionMatrix::parse(FULL).unwrap());
    }

    #[test]
    fn lower_triangle_values_are_ignored() {
        let text = "A C\nA 1 -3\nC 99 2\n";
        let m = SubstitutionMatrix::parse(text).unwrap();
        assert_eq!(m.get(b'C', b'A'), Some(-3));
        assert_eq!(m.get(b'A', b'C'), Some(-3));
    }

    #[test]
    fn values_past_the_last_column_are_ignored() {
        // A full-width row with one extra trailing column, as in files that
        // carry a `*` column the header does not list.
        let text = "A C\nA 1 -3 -4\nC -3 2 -4\n";
        let m = SubstitutionMatrix::parse(text).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(b'A', b'A'), Some(1));
        assert_eq!(m.get(b'A', b'C'), Some(-3));
        assert_eq!(m.get(b'C', b'C'), Some(2));
    }

    #[test]
    fn symmetric_lookup() {
        let m = SubstitutionMatrix::parse(FULL).unwrap();
        for &x in m.symbols() {
            for &y in m.symbols() {
                assert_eq!(m.score(x, y), m.score(y, x));
            }
        }
    }

    #[test]
    fn rejects_non_integer_score() {
        let err = SubstitutionMatrix::parse("A C\nA 1 x\nC 1\n").unwrap_err();
        assert!(matches!(err, AlignError::Matrix { line: 2, .. }), "{err}");
    }

    #[test]
    fn rejects_missing_rows() {
        let err = SubstitutionMatrix::parse("A C\nA 1 0\n").unwrap_err();
        assert!(err.to_string().contains("missing row for symbol 'C'"), "{err}");
    }

    #[test]
    fn rejects_mismatched_label() {
        let err = SubstitutionMatrix::parse("A C\nC 1 0\nA 1\n").unwrap_err();
        assert!(matches!(err, AlignError::Matrix { line: 2, .. }));
    }

    #[test]
    fn rejects_bad_row_width() {
        let err = SubstitutionMatrix::parse("A C G\nA 1 0 0\nC 1\n").unwrap_err();
        assert!(matches!(err, AlignError::Matrix { line: 3, .. }));
        assert!(err.to_string().contains("expected 3 or 2"), "{err}");
    }

    #[test]
    fn rejects_multi_character_symbols() {
        let err = SubstitutionMatrix::parse("Ala Cys\n").unwrap_err();
        assert!(matches!(err, AlignError::Matrix { line: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_header_symbol() {
        assert!(SubstitutionMatrix::parse("A A\n").is_err());
    }

    #[test]
    fn empty_text_has_no_header() {
        let err = SubstitutionMatrix::parse("# nothing\n\n").unwrap_err();
        assert!(matches!(err, AlignError::EmptyMatrix));
    }
}
