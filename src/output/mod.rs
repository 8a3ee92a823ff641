//! Output writers: the packed binary point file and its metadata sidecar.

pub mod binary;
pub mod metadata;

pub use binary::{decode_records, read_records, write_records};
pub use metadata::{parse_sidecar, sidecar_text, write_metadata};
