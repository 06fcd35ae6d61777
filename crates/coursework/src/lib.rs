//! Coursework utilities: triangle classification and small exercises.

pub mod exercises;
pub mod triangle;

pub use triangle::{IncorrectTriangleSides, Triangle, TriangleKind, triangle_type};
