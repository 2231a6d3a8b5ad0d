//! # ucmm-core
//!
//! ICC v4.3 profile parsing and a colorimetric transform engine that maps
//! RGB colors into the device space of a target profile.
//!
//! ## Layout
//!
//! - [`icc`]: header, tag table and typed tag payloads, read lazily from a
//!   file or an in-memory buffer
//! - [`pipeline`]: the [`Ucmm`] transform engine
//! - [`cmm`]: display color management on top of the engine
//! - [`color`], [`math`]: color value types and the numeric building blocks
//!
//! ## Quick Start
//!
//! ```no_run
//! use ucmm_core::{Color, IccProfile, RenderingIntent, Ucmm};
//!
//! let mut display = IccProfile::load_path("display.icc")?;
//! let ucmm = Ucmm::new();
//! let converted = ucmm.srgb_to_target(
//!     RenderingIntent::Perceptual,
//!     Color::rgb(1.0, 0.5, 0.25),
//!     &mut display,
//! )?;
//! println!("{converted:?}");
//! # Ok::<(), ucmm_core::Error>(())
//! ```
//!
//! ## Thread safety
//!
//! Profiles cache parsed tags without locking and are `!Sync`. Use one
//! profile per thread, or guard a shared one with a `Mutex`.

pub mod cmm;
pub mod color;
pub mod error;
pub mod icc;
pub mod math;
pub mod pipeline;

pub use cmm::ColorManagementModule;
pub use color::{Chromaticity, Color, Companding, RgbSystem, Xyz};
pub use error::{Error, Result, ResultCode};
pub use icc::{
    FileSource, IccError, IccParser, IccProfile, MemorySource, ProfileClass, ProfileHeader,
    ProfileSource, RenderingIntent, TagSignature, TypeSignature, TypeVariant,
};
pub use math::AdaptationMethod;
pub use pipeline::{TransformOptions, Ucmm};

/// Version of ucmm-core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
