//! Straight-edged polygons (closed rings and open polylines) and their segments.
//!
//! Every sub-path produced by the decomposer is a [Polygon]; the clipper and offset engine
//! consume and produce them.
mod pgon;
mod segment;

pub use pgon::*;
pub use segment::*;

use static_aabb2d_index::{IndexableNum, StaticAABB2DIndex, StaticAABB2DIndexBuilder};

/// Helper function to unwrap a spatial index from a builder or panic for the unexpected case of
/// failure.
pub(crate) fn unwrap_spatial_index<T>(builder: StaticAABB2DIndexBuilder<T>) -> StaticAABB2DIndex<T>
where
    T: IndexableNum,
{
    use static_aabb2d_index::StaticAABB2DIndexBuildError;
    match builder.build() {
        Ok(x) => x,
        Err(e) => match e {
            StaticAABB2DIndexBuildError::ItemCountError { .. } => {
                unreachable!("internal library error: count mismatch when building spatial index")
            }
            StaticAABB2DIndexBuildError::NumericCastError => {
                panic!("failed to cast coordinate type: {e}")
            }
        },
    }
}

/// Builds a spatial index over `segments` (key is the position in the slice) with every bounding
/// box grown by `fuzz` on all sides.
pub fn build_segment_index<T>(segments: &[Segment<T>], fuzz: T) -> StaticAABB2DIndex<T>
where
    T: crate::core::traits::Real,
{
    let mut builder = StaticAABB2DIndexBuilder::new(segments.len());
    for seg in segments {
        let bb = seg.bounding_box();
        builder.add(
            bb.min_x - fuzz,
            bb.min_y - fuzz,
            bb.max_x + fuzz,
            bb.max_y + fuzz,
        );
    }

    unwrap_spatial_index(builder)
}
