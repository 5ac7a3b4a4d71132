//! Line oriented content scanning.

use regex::bytes::Regex;
use std::io::{self, BufRead, BufReader, Read};

/// Number of leading bytes inspected for a zero byte.
pub const BINARY_PEEK: usize = 256;

/// One matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepMatch {
    /// Line text without its terminator.
    pub line: String,

    /// 1-based line number.
    pub line_number: u64,
}

/// Outcome of scanning one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrepResults {
    /// The contents were classified as binary and not scanned.
    pub is_binary: bool,

    /// Matching lines in file order.
    pub matches: Vec<GrepMatch>,
}

/// Scans `contents` line by line for `pattern`, keeping at most `limit`
/// matches (zero keeps all).
///
/// A zero byte in the first [`BINARY_PEEK`] bytes marks the contents binary
/// and nothing is matched. Lines are split on `\n` with a trailing `\r`
/// removed.
///
/// # Errors
///
/// Returns the underlying read error.
pub fn grep<R: Read>(mut contents: R, pattern: &Regex, limit: usize) -> io::Result<GrepResults> {
    let mut head = Vec::with_capacity(BINARY_PEEK);
    contents
        .by_ref()
        .take(BINARY_PEEK as u64)
        .read_to_end(&mut head)?;
    if head.contains(&0) {
        return Ok(GrepResults {
            is_binary: true,
            matches: Vec::new(),
        });
    }

    let mut results = GrepResults::default();
    let reader = BufReader::new(head.as_slice().chain(contents));
    for (index, line) in reader.split(b'\n').enumerate() {
        if limit > 0 && results.matches.len() >= limit {
            break;
        }

        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        if pattern.is_match(&line) {
            results.matches.push(GrepMatch {
                line: String::from_utf8_lossy(&line).into_owned(),
                line_number: index as u64 + 1,
            });
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(p: &str) -> Regex {
        Regex::new(p).unwrap()
    }

    #[test]
    fn finds_matching_lines() {
        let text = "alpha\nbeta\ngamma\nbetamax\n";
        let results = grep(text.as_bytes(), &pattern("beta"), 0).unwrap();

        assert!(!results.is_binary);
        assert_eq!(
            results.matches,
            [
                GrepMatch {
                    line: "beta".to_string(),
                    line_number: 2
                },
                GrepMatch {
                    line: "betamax".to_string(),
                    line_number: 4
                },
            ]
        );
    }

    #[test]
    fn honours_limit() {
        let text = "x1\nx2\nx3\nx4\n";
        let results = grep(text.as_bytes(), &pattern("x"), 2).unwrap();
        let numbers: Vec<_> = results.matches.iter().map(|m| m.line_number).collect();
        assert_eq!(numbers, [1, 2]);
    }

    #[test]
    fn limit_above_match_count_returns_all() {
        let results = grep("a\nb\na\n".as_bytes(), &pattern("a"), 10).unwrap();
        assert_eq!(results.matches.len(), 2);
    }

    #[test]
    fn detects_binary_prefix() {
        let mut contents = b"match me\n".to_vec();
        contents.push(0);
        contents.extend_from_slice(b"match me again\n");

        let results = grep(contents.as_slice(), &pattern("match"), 0).unwrap();
        assert!(results.is_binary);
        assert!(results.matches.is_empty());
    }

    #[test]
    fn zero_byte_after_peek_window_is_text() {
        let mut contents = vec![b'a'; BINARY_PEEK];
        contents.extend_from_slice(b"\nneedle\n\0\n");

        let results = grep(contents.as_slice(), &pattern("needle"), 0).unwrap();
        assert!(!results.is_binary);
        assert_eq!(results.matches.len(), 1);
        assert_eq!(results.matches[0].line_number, 2);
    }

    #[test]
    fn numbering_spans_peeked_prefix() {
        let mut text = String::new();
        for i in 1..=100 {
            text.push_str(&format!("line {i}\n"));
        }

        let results = grep(text.as_bytes(), &pattern("^line 99$"), 0).unwrap();
        assert_eq!(results.matches.len(), 1);
        assert_eq!(results.matches[0].line_number, 99);
    }

    #[test]
    fn strips_carriage_returns() {
        let results = grep("one\r\ntwo\r\n".as_bytes(), &pattern("two$"), 0).unwrap();
        assert_eq!(results.matches[0].line, "two");
    }

    #[test]
    fn last_line_without_newline() {
        let results = grep("a\nb".as_bytes(), &pattern("b"), 0).unwrap();
        assert_eq!(results.matches[0].line_number, 2);
    }

    #[test]
    fn empty_contents() {
        let results = grep(io::empty(), &pattern("x"), 0).unwrap();
        assert_eq!(results, GrepResults::default());
    }

    #[test]
    fn surfaces_read_errors() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("boom"))
            }
        }

        assert!(grep(Failing, &pattern("x"), 0).is_err());
    }
}
