//! Source readers, one per input format.
//!
//! Each text format has a fixed delimiter, header length and column map
//! (overridable through the pipeline configuration). Files are read whole
//! and then yield rows lazily in source order.

pub mod text;
pub mod halo;
pub mod survey;
pub mod mesh;
pub mod synthetic;

pub use text::{Delimiter, Row, SourceRow, TextTable};
pub use halo::HaloRow;
pub use survey::SurveyRow;
pub use mesh::VertexRow;
pub use synthetic::{Distribution, PlaneRow};
