//! Minimal fixed-size vector and matrix types used by the estimators

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
