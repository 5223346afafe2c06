// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Server configuration.
//!
//! The term calendar and the pupil roster are loaded from a JSON file at
//! startup. Dates are ISO 8601 calendar dates (`2025-01-01`); the whole
//! calendar is validated before the server accepts traffic.

use serde::Deserialize;
use std::collections::BTreeMap;
use termsnap_domain::{
    AcademicYear, DomainError, PupilAttributes, PupilId, Term, TermId, validate_years,
};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Errors raised while loading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Read {
        /// The configured path.
        path: String,
        /// The underlying I/O failure.
        message: String,
    },
    /// The file is not valid JSON or does not match the expected shape.
    Parse {
        /// The underlying deserialization failure.
        message: String,
    },
    /// A date field is not a valid ISO 8601 calendar date.
    InvalidDate {
        /// The offending value.
        value: String,
    },
    /// The configured calendar violates a domain invariant.
    Calendar(DomainError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "Cannot read configuration file {path}: {message}")
            }
            Self::Parse { message } => write!(f, "Cannot parse configuration file: {message}"),
            Self::InvalidDate { value } => write!(f, "Invalid date in configuration: {value}"),
            Self::Calendar(err) => write!(f, "Invalid academic calendar: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<DomainError> for ConfigError {
    fn from(err: DomainError) -> Self {
        Self::Calendar(err)
    }
}

/// The top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// The configured academic years.
    pub academic_years: Vec<YearConfig>,
    /// The pupil roster backing the attributes provider.
    pub pupils: Vec<PupilConfig>,
}

/// One academic year with its terms.
#[derive(Debug, Clone, Deserialize)]
pub struct YearConfig {
    /// The calendar year label.
    pub year: u16,
    /// First day of the academic year (inclusive).
    pub starts_on: String,
    /// Last day of the academic year (inclusive).
    pub ends_on: String,
    /// The terms of this year, in chronological order.
    pub terms: Vec<TermConfig>,
}

/// One term within an academic year.
#[derive(Debug, Clone, Deserialize)]
pub struct TermConfig {
    /// The term identifier, unique across all years.
    pub id: i64,
    /// The display name.
    pub name: String,
    /// First day of the term (inclusive).
    pub starts_on: String,
    /// Last day of the term (inclusive).
    pub ends_on: String,
}

/// One pupil in the roster.
#[derive(Debug, Clone, Deserialize)]
pub struct PupilConfig {
    /// The pupil identifier.
    pub id: i64,
    /// The pupil's class group.
    pub class_group: String,
    /// The pupil's section.
    pub section: String,
    /// The pupil's fee category.
    pub fee_category: String,
}

impl ConfigFile {
    /// Loads and deserializes the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw: String = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// Deserializes a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })
    }

    /// Builds the validated term calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if a date does not parse or the calendar violates a
    /// domain invariant.
    pub fn academic_years(&self) -> Result<Vec<AcademicYear>, ConfigError> {
        let mut years: Vec<AcademicYear> = Vec::with_capacity(self.academic_years.len());
        for year in &self.academic_years {
            let mut terms: Vec<Term> = Vec::with_capacity(year.terms.len());
            for term in &year.terms {
                terms.push(Term::new(
                    TermId::new(term.id),
                    year.year,
                    term.name.clone(),
                    parse_date(&term.starts_on)?,
                    parse_date(&term.ends_on)?,
                )?);
            }
            years.push(AcademicYear::new(
                year.year,
                parse_date(&year.starts_on)?,
                parse_date(&year.ends_on)?,
                terms,
            )?);
        }
        validate_years(&years)?;
        Ok(years)
    }

    /// Builds the roster map backing the attributes provider.
    #[must_use]
    pub fn roster(&self) -> BTreeMap<PupilId, PupilAttributes> {
        self.pupils
            .iter()
            .map(|pupil| {
                (
                    PupilId::new(pupil.id),
                    PupilAttributes::new(
                        pupil.class_group.clone(),
                        pupil.section.clone(),
                        pupil.fee_category.clone(),
                    ),
                )
            })
            .collect()
    }
}

fn parse_date(value: &str) -> Result<Date, ConfigError> {
    Date::parse(value, DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        value: value.to_string(),
    })
}
