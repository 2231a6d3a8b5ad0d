//! Color value types
//!
//! - CIE XYZ and CIELAB, the two Profile Connection Spaces
//! - Chromaticities and reference whites
//! - RGB colors and the RGB system description used as a transform source

pub mod lab;
pub mod rgb;
pub mod white_point;
pub mod xyz;

pub use lab::Lab;
pub use rgb::{Color, Companding, RgbSystem};
pub use white_point::{Chromaticity, D50, D65, ICC_D50, WhitePoint};
pub use xyz::Xyz;
