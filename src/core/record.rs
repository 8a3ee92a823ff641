//! Point record and record set.

use bytemuck::{Pod, Zeroable};

use crate::util::{BBox3f, Vec3};

/// Size of one serialized record in bytes.
pub const RECORD_SIZE: usize = std::mem::size_of::<PointRecord>();

/// A single weighted point, laid out exactly as the renderer reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub weight: f32,
}

impl PointRecord {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, weight: f32) -> Self {
        Self { x, y, z, weight }
    }

    /// Build from a position and weight.
    #[inline]
    pub fn from_position(p: Vec3, weight: f32) -> Self {
        Self::new(p.x, p.y, p.z, weight)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Ordered, append-only collection of accepted records.
///
/// Insertion order is source order so that sampled subsets stay comparable
/// between runs with the same seed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<PointRecord>,
}

impl RecordSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set pre-sized to an upper bound (usually the source row count).
    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: Vec::with_capacity(capacity) }
    }

    #[inline]
    pub fn push(&mut self, record: PointRecord) {
        self.records.push(record);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[PointRecord] {
        &self.records
    }

    /// First record, reported as a sample on the console.
    pub fn first(&self) -> Option<&PointRecord> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRecord> {
        self.records.iter()
    }

    /// Raw bytes in serialized layout (native-endian, tightly packed).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    /// Spatial bounds of all records.
    pub fn bounds(&self) -> BBox3f {
        BBox3f::from_points(self.records.iter().map(PointRecord::position))
    }

    /// Drop unused capacity once the set is final.
    pub fn finalize(mut self) -> Self {
        self.records.shrink_to_fit();
        self
    }
}

impl From<Vec<PointRecord>> for RecordSet {
    fn from(records: Vec<PointRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a PointRecord;
    type IntoIter = std::slice::Iter<'a, PointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
