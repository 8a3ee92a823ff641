//! Spherical-coordinate galaxy surveys.

use crate::source::text::{Delimiter, Row, SourceRow};
use crate::util::Result;

/// A single column-title line precedes the data.
pub const SURVEY_HEADER_LINES: usize = 1;

/// Column map `[azimuth, declination, radius, log_mass]`.
pub const SURVEY_COLUMNS: [usize; 4] = [1, 2, 3, 4];

pub const SURVEY_DELIMITER: Delimiter = Delimiter::Whitespace;

/// One survey object in spherical coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurveyRow {
    /// Degrees.
    pub azimuth: f64,
    /// Degrees from the equator; 90 is the pole.
    pub declination: f64,
    /// Luminosity distance.
    pub radius: f64,
    /// log10 of the stellar mass.
    pub log_mass: f64,
}

impl SourceRow for SurveyRow {
    const COLUMNS: usize = 4;

    fn from_row(row: &Row<'_>, columns: &[usize]) -> Result<Self> {
        Ok(Self {
            azimuth: row.number(columns[0])?,
            declination: row.number(columns[1])?,
            radius: row.number(columns[2])?,
            log_mass: row.number(columns[3])?,
        })
    }
}
