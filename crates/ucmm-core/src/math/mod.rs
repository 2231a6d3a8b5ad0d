//! Numeric building blocks
//!
//! - 3x3 matrices for RGB↔XYZ and adaptation
//! - Transfer functions and their inverses
//! - Chromatic adaptation
//! - Table and CLUT interpolation

pub mod chromatic_adaptation;
pub mod gamma;
pub mod interpolation;
pub mod matrix;

pub use chromatic_adaptation::{AdaptationMethod, adapt_xyz, adaptation_matrix};
pub use gamma::{FunctionType, ParametricFunction, srgb_gamma_decode, srgb_gamma_encode};
pub use interpolation::{lerp, multilinear, table_lookup};
pub use matrix::Matrix3x3;
