//! Core numeric primitives (Vector, Matrix).
//!
//! These types carry the response vector and predictor matrix through
//! compression and into the sampler data binding.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
