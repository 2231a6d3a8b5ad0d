//! Display color management
//!
//! [`ColorManagementModule`] owns the display profile handed over by the
//! platform layer and converts sRGB colors into it.

use std::path::PathBuf;

use log::{debug, warn};

use crate::color::Color;
use crate::error::Result;
use crate::icc::{FileSource, IccProfile, ProfileSource, RenderingIntent};
use crate::pipeline::{TransformOptions, Ucmm};

/// sRGB → display conversions against an optional display profile
#[derive(Debug)]
pub struct ColorManagementModule<S: ProfileSource = FileSource> {
    ucmm: Ucmm,
    intent: RenderingIntent,
    display: Option<IccProfile<S>>,
}

impl<S: ProfileSource> Default for ColorManagementModule<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorManagementModule<FileSource> {
    /// Load the display profile at `path`. On failure the previous profile
    /// is dropped and the error returned.
    pub fn load_display_profile(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.display = None;
        match IccProfile::load_path(&path) {
            Ok(profile) => {
                debug!("display profile loaded from {}", path.display());
                self.display = Some(profile);
                Ok(())
            }
            Err(e) => {
                warn!("cannot load display profile {}: {e}", path.display());
                Err(e.into())
            }
        }
    }
}

impl<S: ProfileSource> ColorManagementModule<S> {
    pub fn new() -> Self {
        Self::with_options(TransformOptions::default())
    }

    pub fn with_options(options: TransformOptions) -> Self {
        Self {
            ucmm: Ucmm::with_options(options),
            intent: RenderingIntent::Perceptual,
            display: None,
        }
    }

    pub fn set_display_profile(&mut self, profile: IccProfile<S>) {
        self.display = Some(profile);
    }

    pub fn clear_display_profile(&mut self) {
        self.display = None;
    }

    pub fn display_profile(&self) -> Option<&IccProfile<S>> {
        self.display.as_ref()
    }

    pub fn intent(&self) -> RenderingIntent {
        self.intent
    }

    pub fn set_intent(&mut self, intent: RenderingIntent) {
        self.intent = intent;
    }

    /// Convert one sRGB color into the display space.
    ///
    /// Without a display profile the color is returned unchanged.
    pub fn convert_color(&mut self, srgb: Color) -> Result<Color> {
        match self.display.as_mut() {
            Some(profile) => self.ucmm.srgb_to_target(self.intent, srgb, profile),
            None => Ok(srgb),
        }
    }

    /// Convert colors in place. Either every color is converted or, on
    /// error, none is modified.
    pub fn convert_colors(&mut self, colors: &mut [Color]) -> Result<()> {
        let converted = colors
            .iter()
            .map(|&c| self.convert_color(c))
            .collect::<Result<Vec<_>>>()?;
        colors.copy_from_slice(&converted);
        Ok(())
    }
}
