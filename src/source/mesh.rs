//! OBJ mesh vertex lists.
//!
//! Only `v` records are read; faces, normals, texture coordinates and comments
//! are skipped without error.

use crate::source::text::{Delimiter, Row, SourceRow, TextTable};
use crate::util::{DVec3, Result};

/// First token of a vertex record.
pub const VERTEX_TAG: &str = "v";

/// Column map `[x, y, z]`, optionally followed by `[r, g, b]` vertex colour.
pub const MESH_COLUMNS: [usize; 3] = [1, 2, 3];

/// Column map including the per-vertex colour extension.
pub const MESH_COLOR_COLUMNS: [usize; 6] = [1, 2, 3, 4, 5, 6];

pub const MESH_DELIMITER: Delimiter = Delimiter::Whitespace;

/// One mesh vertex in modeling-tool coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexRow {
    pub position: DVec3,
    /// Present when the column map names colour channels.
    pub color: Option<DVec3>,
}

impl SourceRow for VertexRow {
    const COLUMNS: usize = 3;

    fn from_row(row: &Row<'_>, columns: &[usize]) -> Result<Self> {
        let position = DVec3::new(
            row.number(columns[0])?,
            row.number(columns[1])?,
            row.number(columns[2])?,
        );
        let color = match columns.get(3..6) {
            Some(&[r, g, b]) => Some(DVec3::new(row.number(r)?, row.number(g)?, row.number(b)?)),
            _ => None,
        };
        Ok(Self { position, color })
    }
}

fn is_vertex(row: &Row<'_>) -> bool {
    row.field(0).is_ok_and(|tag| tag == VERTEX_TAG)
}

/// Number of vertex records in the table.
pub fn vertex_count(table: &TextTable) -> usize {
    table.rows().filter(is_vertex).count()
}

/// Parse every vertex record in source order.
pub fn vertices<'a>(
    table: &'a TextTable,
    columns: &'a [usize],
) -> impl Iterator<Item = Result<VertexRow>> + 'a {
    table
        .rows()
        .filter(is_vertex)
        .map(move |row| VertexRow::from_row(&row, columns))
}
