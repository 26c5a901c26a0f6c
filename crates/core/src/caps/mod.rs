//! Capability set algebra
//!
//! Capabilities describe constrained sets of acceptable formats rather than
//! single concrete formats, so compatibility between two stages is a
//! set-intersection test, not an equality check.

pub mod constraints;
pub mod set;

pub use constraints::{
    AudioConstraints, AudioSampleFormat, ConstraintValue, FormatSpec, PixelFormat,
    VideoConstraints,
};
pub use set::CapsSet;
