//! Section height units.
//!
//! Sections are either sized in absolute pixels or as a percentage of the
//! rendering viewport's height. The unit is carried explicitly on every
//! section so conversion never has to guess.

#[cfg(test)]
#[path = "units_test.rs"]
mod units_test;

use serde::{Deserialize, Serialize};

/// Unit a section height is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    /// Absolute CSS pixels.
    #[default]
    Px,
    /// Percentage of the viewport height (`100vh` is one full viewport).
    Vh,
}

/// A height value tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionHeight {
    pub value: f64,
    pub unit: HeightUnit,
}

impl SectionHeight {
    #[must_use]
    pub fn px(value: f64) -> Self {
        Self { value, unit: HeightUnit::Px }
    }

    #[must_use]
    pub fn vh(value: f64) -> Self {
        Self { value, unit: HeightUnit::Vh }
    }

    /// Convert to pixels against the supplied viewport height.
    #[must_use]
    pub fn to_px(self, viewport_height: f64) -> f64 {
        match self.unit {
            HeightUnit::Px => self.value,
            HeightUnit::Vh => vh_to_px(self.value, viewport_height),
        }
    }
}

/// `(vh / 100) * viewport_height`.
#[must_use]
pub fn vh_to_px(vh: f64, viewport_height: f64) -> f64 {
    (vh / 100.0) * viewport_height
}

/// Inverse of [`vh_to_px`]. Returns `0.0` for a non-positive viewport.
#[must_use]
pub fn px_to_vh(px: f64, viewport_height: f64) -> f64 {
    if viewport_height <= 0.0 {
        return 0.0;
    }
    px / viewport_height * 100.0
}

/// Whether a converted pixel height can take part in layout.
#[must_use]
pub fn is_valid_px(px: f64) -> bool {
    px.is_finite() && px > 0.0
}
