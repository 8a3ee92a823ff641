//! Halo-finder catalogs (Rockstar `.list` output).

use crate::source::text::{Delimiter, Row, SourceRow};
use crate::util::{DVec3, Result};

/// Rockstar writes 16 comment lines before the first halo.
pub const HALO_HEADER_LINES: usize = 16;

/// Column map `[mass, x, y, z]`: `Mvir`, `X`, `Y`, `Z`.
pub const HALO_COLUMNS: [usize; 4] = [2, 8, 9, 10];

pub const HALO_DELIMITER: Delimiter = Delimiter::Whitespace;

/// One catalog halo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaloRow {
    /// Virial mass as stored in the catalog.
    pub mass: f64,
    /// Comoving position.
    pub position: DVec3,
}

impl SourceRow for HaloRow {
    const COLUMNS: usize = 4;

    fn from_row(row: &Row<'_>, columns: &[usize]) -> Result<Self> {
        Ok(Self {
            mass: row.number(columns[0])?,
            position: DVec3::new(
                row.number(columns[1])?,
                row.number(columns[2])?,
                row.number(columns[3])?,
            ),
        })
    }
}
