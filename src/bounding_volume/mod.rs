//! Bounding volumes.

#[doc(inline)]
pub use crate::bounding_volume::aabb::{Aabb, Aabb2, Aabb3};

#[doc(hidden)]
pub mod aabb;
