//! Core module has the shared numeric traits and math used by the decomposer, clipper and
//! offset engine.
pub mod math;
pub mod traits;
