//! Path decomposition, destructive clipping and polygon offsetting for SVG path data.
//!
//! The pipeline is: parse path data ([path::PathData]), decompose it into straight-edged
//! sub-paths ([polygon::Polygon]), then clip ([clip::ClipRegion]) or offset
//! ([offset::offset_path]) and re-encode the result ([path::encode]).
extern crate static_aabb2d_index;

#[macro_use]
mod macros;

pub mod clip;
pub mod core;
pub mod offset;
pub mod path;
pub mod polygon;
pub mod shape;

pub use static_aabb2d_index::AABB;
