pub mod gauss_jordan;
pub mod matrix;

pub use gauss_jordan::{reduce, GaussJordan, Reduction, EPS};
pub use matrix::{AugmentedMatrix, SystemShape};
