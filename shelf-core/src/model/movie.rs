//! ``src/model/movie.rs``
//! ============================================================================
//! # Movie records and client-side validation
//!
//! `Movie` is the normalized record the client keeps in memory. `MovieDraft`
//! is what the add form produces and what gets submitted on create;
//! `MoviePatch` is the partial body used by update.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OpError;

/// Opaque backend identity. Numeric ids from the server are kept as text.
pub type MovieId = String;

/// Earliest accepted release year.
pub const MIN_YEAR: i32 = 1800;

/// How many years past the current one a release year may lie.
pub const FUTURE_YEAR_SLACK: i32 = 5;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const YEAR_INVALID: &str = "Valid year is required (1800 - current year + 5)";
pub const FORMAT_INVALID: &str = "Valid format is required (VHS, DVD, or Blu-Ray)";

/// Physical media format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovieFormat {
    #[serde(rename = "VHS")]
    Vhs,
    #[serde(rename = "DVD")]
    Dvd,
    #[serde(rename = "Blu-Ray")]
    BluRay,
}

impl MovieFormat {
    pub const ALL: [Self; 3] = [Self::Vhs, Self::Dvd, Self::BluRay];

    /// Canonical wire spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vhs => "VHS",
            Self::Dvd => "DVD",
            Self::BluRay => "Blu-Ray",
        }
    }

    /// Case-insensitive match that also accepts the common Blu-ray spellings.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "vhs" => Some(Self::Vhs),
            "dvd" => Some(Self::Dvd),
            "blu-ray" | "bluray" | "blue-ray" => Some(Self::BluRay),
            _ => None,
        }
    }

    /// Next format in display order, wrapping around. Used by the filter toggle.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Vhs),
            Some(Self::Vhs) => Some(Self::Dvd),
            Some(Self::Dvd) => Some(Self::BluRay),
            Some(Self::BluRay) => None,
        }
    }
}

impl fmt::Display for MovieFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_loose(s).ok_or_else(|| s.trim().to_owned())
    }
}

/// A movie as held by the state container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub format: MovieFormat,
    pub actors: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Upper bound of the accepted year range for a given current year.
pub const fn max_year_for(current_year: i32) -> i32 {
    current_year + FUTURE_YEAR_SLACK
}

/// The current calendar year according to the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn year_in_range(year: i32, current_year: i32) -> bool {
    (MIN_YEAR..=max_year_for(current_year)).contains(&year)
}

/// Split a comma separated actor list, trimming and dropping empties.
pub fn split_actors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Data submitted on create: `{title, year, format, actors}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub format: MovieFormat,
    pub actors: Vec<String>,
}

impl MovieDraft {
    /// Check the draft against the year window computed from `current_year`.
    /// Returns every violated rule, in field order.
    pub fn problems(&self, current_year: i32) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push(TITLE_REQUIRED);
        }
        if !year_in_range(self.year, current_year) {
            problems.push(YEAR_INVALID);
        }
        problems
    }

    pub fn validate(&self, current_year: i32) -> Result<(), OpError> {
        let problems = self.problems(current_year);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(OpError::validation(problems))
        }
    }

    /// Build a draft from raw form text. Actors are comma separated and
    /// de-duplicated keeping first occurrence.
    pub fn from_fields(
        title: &str,
        year: &str,
        format: &str,
        actors: &str,
        current_year: i32,
    ) -> Result<Self, OpError> {
        let mut problems = Vec::new();

        let title = title.trim().to_owned();
        if title.is_empty() {
            problems.push(TITLE_REQUIRED);
        }

        let year = match year.trim().parse::<i32>() {
            Ok(y) if year_in_range(y, current_year) => Some(y),
            _ => {
                problems.push(YEAR_INVALID);
                None
            }
        };

        let format = MovieFormat::parse_loose(format);
        if format.is_none() {
            problems.push(FORMAT_INVALID);
        }

        let mut unique: Vec<String> = Vec::new();
        for actor in split_actors(actors) {
            if !unique.contains(&actor) {
                unique.push(actor);
            }
        }

        match (year, format) {
            (Some(year), Some(format)) if problems.is_empty() => Ok(Self {
                title,
                year,
                format,
                actors: unique,
            }),
            _ => Err(OpError::validation(problems)),
        }
    }
}

/// Partial body for `PATCH /movies/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<MovieFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<String>>,
}

impl MoviePatch {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.year.is_none() && self.format.is_none() && self.actors.is_none()
    }

    pub fn validate(&self, current_year: i32) -> Result<(), OpError> {
        let mut problems = Vec::new();
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            problems.push(TITLE_REQUIRED);
        }
        if let Some(year) = self.year
            && !year_in_range(year, current_year)
        {
            problems.push(YEAR_INVALID);
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(OpError::validation(problems))
        }
    }
}
