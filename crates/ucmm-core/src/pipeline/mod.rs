//! Colorimetric transform from an RGB source into a target profile
//!
//! Every conversion runs the same sequence:
//! 1. Linearize the source RGB with the system's transfer function
//! 2. Linear RGB → XYZ with the system's primaries matrix
//! 3. Adapt to the target's media white point when the whites differ
//! 4. Rescale into the target's media-relative PCS
//! 5. Dispatch on the target's device class: a LUT picked by rendering
//!    intent, or the matrix/TRC path when the profile has no usable LUT
//!
//! Alpha is carried through untouched.

pub mod context;
pub mod lut;
pub mod matrix_shaper;
pub mod stages;

pub use context::TransformOptions;

use log::{debug, trace};

use crate::color::{Color, RgbSystem, Xyz};
use crate::error::{Error, Result};
use crate::icc::{
    ColorSpace, IccProfile, ProfileClass, ProfileSource, RenderingIntent, TagSignature,
};

use self::stages::{
    adapt, linearize, pcs_rescale, read_xyz_tag, rgb_to_xyz_matrix, white_points_differ,
};

/// LUT tags to try for an intent, in order of preference
pub fn intent_tag_order(intent: RenderingIntent) -> &'static [TagSignature] {
    match intent {
        RenderingIntent::Perceptual => &[TagSignature::B2D0, TagSignature::B2A0],
        RenderingIntent::Saturation => {
            &[TagSignature::B2D2, TagSignature::B2A2, TagSignature::B2A0]
        }
        RenderingIntent::AbsoluteColorimetric => {
            &[TagSignature::B2D3, TagSignature::B2A1, TagSignature::B2A0]
        }
        RenderingIntent::RelativeColorimetric => {
            &[TagSignature::B2D1, TagSignature::B2A1, TagSignature::B2A0]
        }
    }
}

/// The colorimetric transform engine.
///
/// Holds only options; profiles are passed per call and are read lazily,
/// so the first conversion against a profile parses the tags it needs.
#[derive(Debug, Clone, Default)]
pub struct Ucmm {
    options: TransformOptions,
}

impl Ucmm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Convert an sRGB color into the device space of `target`
    pub fn srgb_to_target<S: ProfileSource>(
        &self,
        intent: RenderingIntent,
        srgb: Color,
        target: &mut IccProfile<S>,
    ) -> Result<Color> {
        self.rgb_to_target(intent, srgb, &RgbSystem::SRGB, target)
    }

    /// Convert a color encoded in `system` into the device space of `target`
    pub fn rgb_to_target<S: ProfileSource>(
        &self,
        intent: RenderingIntent,
        rgb: Color,
        system: &RgbSystem,
        target: &mut IccProfile<S>,
    ) -> Result<Color> {
        let header = target.header().map_err(|_| Error::NoHeader)?;
        let class = header.device_class;
        let pcs = header.pcs;
        let illuminant = header.illuminant.to_xyz();

        let linear = linearize(rgb.channels(), system.companding);
        let xyz = Xyz::from_array(rgb_to_xyz_matrix(system)?.apply(linear));
        trace!("source {rgb:?} -> linear {linear:?} -> {xyz:?}");

        let source_white = system.white.to_xyz();
        let media_white = read_xyz_tag(target, TagSignature::MEDIA_WHITE)?;
        let tolerance = self.options.white_point_tolerance;
        let xyz = if white_points_differ(source_white, media_white, tolerance) {
            adapt(xyz, source_white, media_white, self.options.adaptation)?
        } else {
            xyz
        };

        let pcs_xyz = pcs_rescale(xyz, illuminant, media_white)?;
        trace!("media-relative PCS {pcs_xyz:?}");

        let device = match class {
            ProfileClass::Input
            | ProfileClass::Display
            | ProfileClass::Output
            | ProfileClass::ColorSpace => {
                self.transform_idocs(intent, pcs_xyz, pcs, illuminant, target)?
            }
            ProfileClass::DeviceLink | ProfileClass::Abstract => {
                return Err(Error::NotImplemented(format!("{class:?} profiles")));
            }
            ProfileClass::NamedColor | ProfileClass::Unknown(_) => {
                return Err(Error::NoData(format!("no transform for {class:?} profiles")));
            }
        };

        let device = if self.options.clamp_output {
            device.map(|v| v.clamp(0.0, 1.0))
        } else {
            device
        };
        Ok(Color::from_channels(device, rgb.a))
    }

    /// Input, display, output and color space classes
    fn transform_idocs<S: ProfileSource>(
        &self,
        intent: RenderingIntent,
        pcs_xyz: Xyz,
        pcs: ColorSpace,
        illuminant: Xyz,
        target: &mut IccProfile<S>,
    ) -> Result<[f64; 3]> {
        for &sig in intent_tag_order(intent) {
            if target.has_tag(sig)? {
                debug!("{intent:?}: transforming through '{sig}'");
                return lut::pcs_to_device(target, sig, pcs_xyz, pcs, illuminant);
            }
        }
        debug!("{intent:?}: no LUT tag, using matrix/TRC");
        matrix_shaper::pcs_to_device(target, pcs_xyz, illuminant, &self.options)
    }
}
