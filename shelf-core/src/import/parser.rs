//! ``src/import/parser.rs``
//! ============================================================================
//! # Catalog parser
//!
//! Turns the plain-text catalog format into movie drafts. Records are blocks
//! of label-prefixed lines separated by blank lines:
//!
//! ```text
//! Title: Blazing Saddles
//! Release Year: 1974
//! Format: VHS
//! Stars: Mel Brooks, Clevon Little, Harvey Korman
//! ```
//!
//! `Stars:` is optional. Rejected blocks produce one error each, carrying the
//! 1-based block index; they never abort the rest of the parse.

use std::fmt;

use crate::model::movie::{MovieDraft, MovieFormat, max_year_for, split_actors, year_in_range};

const TITLE_LABEL: &str = "Title:";
const YEAR_LABEL: &str = "Release Year:";
const FORMAT_LABEL: &str = "Format:";
const STARS_LABEL: &str = "Stars:";

/// Why one block was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockError {
    /// 1-based position of the block in the file.
    pub block: usize,
    pub reason: String,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block {}: {}", self.block, self.reason)
    }
}

/// Result of parsing a whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Accepted records, in file order.
    pub movies: Vec<MovieDraft>,
    /// One entry per rejected block, in file order.
    pub errors: Vec<BlockError>,
    /// Number of non-empty blocks seen, valid or not.
    pub blocks: usize,
}

impl ParseOutcome {
    pub fn has_movies(&self) -> bool {
        !self.movies.is_empty()
    }
}

/// Parse catalog text, validating years against `current_year + 5`.
pub fn parse_catalog(content: &str, current_year: i32) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (index, block) in split_blocks(content).into_iter().enumerate() {
        let block_no = index + 1;
        outcome.blocks += 1;
        match parse_block(&block, current_year) {
            Ok(draft) => outcome.movies.push(draft),
            Err(reason) => outcome.errors.push(BlockError {
                block: block_no,
                reason,
            }),
        }
    }

    outcome
}

/// Group trimmed lines into blocks; whitespace-only lines separate blocks.
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn labelled<'a>(lines: &[&'a str], label: &str) -> Option<&'a str> {
    lines
        .iter()
        .find_map(|line| line.strip_prefix(label))
        .map(str::trim)
}

fn parse_block(lines: &[&str], current_year: i32) -> Result<MovieDraft, String> {
    let title = labelled(lines, TITLE_LABEL);
    let year = labelled(lines, YEAR_LABEL);
    let format = labelled(lines, FORMAT_LABEL);

    let (Some(title), Some(year), Some(format)) = (title, year, format) else {
        let missing: Vec<&str> = [
            (title.is_none(), "Title"),
            (year.is_none(), "Release Year"),
            (format.is_none(), "Format"),
        ]
        .into_iter()
        .filter_map(|(absent, name)| absent.then_some(name))
        .collect();
        return Err(format!("Missing required fields ({})", missing.join(", ")));
    };

    if title.is_empty() {
        return Err("Title is empty".to_owned());
    }

    let Some(format) = MovieFormat::parse_loose(format) else {
        return Err(format!(
            "Invalid format \"{format}\". Supported: VHS, DVD, Blu-Ray"
        ));
    };

    let year: i32 = year
        .parse()
        .map_err(|_| format!("Invalid year \"{year}\""))?;
    if !year_in_range(year, current_year) {
        return Err(format!(
            "Invalid year {year} (expected 1800-{})",
            max_year_for(current_year)
        ));
    }

    let actors = labelled(lines, STARS_LABEL)
        .map(split_actors)
        .unwrap_or_default();

    Ok(MovieDraft {
        title: title.to_owned(),
        year,
        format,
        actors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2026;

    #[test]
    fn well_formed_block_parses() {
        let out = parse_catalog("Title: X\nRelease Year: 1999\nFormat: DVD\nStars: A, B", YEAR);
        assert_eq!(out.blocks, 1);
        assert!(out.errors.is_empty());
        assert_eq!(
            out.movies,
            vec![MovieDraft {
                title: "X".into(),
                year: 1999,
                format: MovieFormat::Dvd,
                actors: vec!["A".into(), "B".into()],
            }]
        );
    }

    #[test]
    fn missing_format_in_second_block_is_reported_by_position() {
        let text = "Title: Casablanca\nRelease Year: 1942\nFormat: DVD\n\n\
                    Title: Charade\nRelease Year: 1953\nStars: Audrey Hepburn\n";
        let out = parse_catalog(text, YEAR);
        assert_eq!(out.movies.len(), 1);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].block, 2);
        assert!(out.errors[0].to_string().starts_with("Block 2: Missing required fields"));
        assert!(out.errors[0].reason.contains("Format"));
        assert_eq!(out.blocks, 2);
    }

    #[test]
    fn stars_are_optional_and_trimmed() {
        let text = "Title: Solo\nRelease Year: 2018\nFormat: blu-ray\n\n\
                    Title: Duo\nRelease Year: 2019\nFormat: VHS\nStars:  Ann ,, Bob , ";
        let out = parse_catalog(text, YEAR);
        assert_eq!(out.movies[0].actors, Vec::<String>::new());
        assert_eq!(out.movies[0].format, MovieFormat::BluRay);
        assert_eq!(out.movies[1].actors, vec!["Ann", "Bob"]);
    }

    #[test]
    fn bad_format_and_year_reject_their_blocks() {
        let text = "Title: A\nRelease Year: 2000\nFormat: Betamax\n\n\
                    Title: B\nRelease Year: 1700\nFormat: DVD\n\n\
                    Title: C\nRelease Year: soon\nFormat: DVD\n\n\
                    Title: D\nRelease Year: 2001\nFormat: dvd";
        let out = parse_catalog(text, YEAR);
        assert_eq!(out.blocks, 4);
        assert_eq!(out.movies.len(), 1);
        assert_eq!(out.movies[0].title, "D");
        let blocks: Vec<usize> = out.errors.iter().map(|e| e.block).collect();
        assert_eq!(blocks, vec![1, 2, 3]);
        assert!(out.errors[0].reason.contains("\"Betamax\""));
    }

    #[test]
    fn crlf_and_padded_separators_split_blocks() {
        let text = "Title: A\r\nRelease Year: 2000\r\nFormat: DVD\r\n   \r\n\r\nTitle: B\r\nRelease Year: 2001\r\nFormat: VHS\r\n";
        let out = parse_catalog(text, YEAR);
        assert_eq!(out.blocks, 2);
        assert_eq!(out.movies.len(), 2);
    }

    #[test]
    fn empty_input_has_no_blocks() {
        let out = parse_catalog("\n\n  \n", YEAR);
        assert_eq!(out, ParseOutcome::default());
        assert!(!out.has_movies());
    }
}
