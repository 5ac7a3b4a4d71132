//! Result lines written by the walker.

use crate::github::EntryKind;
use chrono::{DateTime, Utc};
use std::fmt;

/// Layout of commit dates in detailed listings, e.g. `Jan 2 15:04:05 2006`.
pub const DETAIL_DATE_FORMAT: &str = "%b %-d %H:%M:%S %Y";

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindMatch<'a> {
    /// `<owner/repo> <path>`
    Entry { repo: &'a str, path: &'a str },

    /// `<owner/repo> <path> <line-number> <line>`
    Grep {
        repo: &'a str,
        path: &'a str,
        line_number: u64,
        line: &'a str,
    },

    /// `<owner/repo> <f|d> <author> <size> <date> <path>`
    Detail {
        repo: &'a str,
        kind: EntryKind,
        author: Option<&'a str>,
        size: u64,
        date: Option<DateTime<Utc>>,
        path: &'a str,
    },

    /// `<owner/repo>` of a repository without matches.
    NoMatches { repo: &'a str },
}

impl fmt::Display for FindMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry { repo, path } => write!(f, "{repo} {path}"),
            Self::Grep {
                repo,
                path,
                line_number,
                line,
            } => write!(f, "{repo} {path} {line_number} {line}"),
            Self::Detail {
                repo,
                kind,
                author,
                size,
                date,
                path,
            } => {
                write!(
                    f,
                    "{repo} {} {} {size} ",
                    kind.short_name(),
                    author.unwrap_or("-")
                )?;
                match date {
                    Some(date) => write!(f, "{}", date.format(DETAIL_DATE_FORMAT))?,
                    None => f.write_str("-")?,
                }
                write!(f, " {path}")
            }
            Self::NoMatches { repo } => f.write_str(repo),
        }
    }
}
