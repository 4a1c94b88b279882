//! Layout configuration parsed from environment variables.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_BOTTOM_MARGIN_PX;
use crate::error::LayoutError;

pub const BOTTOM_MARGIN_ENV: &str = "LAYOUT_BOTTOM_MARGIN_PX";
pub const UNKNOWN_SECTION_ENV: &str = "LAYOUT_UNKNOWN_SECTION";

/// What the editor does when a dragged element's section has disappeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSectionPolicy {
    /// Treat the element as dragged past the bottom: move it into the last section.
    #[default]
    ClampBelow,
    /// Leave the element where it is.
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Gap kept above the last section's bottom edge when clamping below, in pixels.
    pub bottom_margin: f64,
    pub unknown_section: UnknownSectionPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { bottom_margin: DEFAULT_BOTTOM_MARGIN_PX, unknown_section: UnknownSectionPolicy::default() }
    }
}

impl LayoutConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `LAYOUT_BOTTOM_MARGIN_PX`: non-negative number, default 50
    /// - `LAYOUT_UNKNOWN_SECTION`: `clamp_below` (default) or `keep`
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ConfigParse`] when a variable is set but unparseable.
    pub fn from_env() -> Result<Self, LayoutError> {
        let bottom_margin = parse_bottom_margin(env_var(BOTTOM_MARGIN_ENV).as_deref())?;
        let unknown_section = parse_unknown_section(env_var(UNKNOWN_SECTION_ENV).as_deref())?;
        Ok(Self { bottom_margin, unknown_section })
    }

    /// Replace the bottom margin.
    ///
    /// # Errors
    ///
    /// Rejects negative and non-finite margins.
    pub fn with_bottom_margin(self, bottom_margin: f64) -> Result<Self, LayoutError> {
        if bottom_margin.is_finite() && bottom_margin >= 0.0 {
            Ok(Self { bottom_margin, ..self })
        } else {
            Err(LayoutError::ConfigParse(format!("invalid bottom margin: {bottom_margin}")))
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// Parse a bottom margin, falling back to the default when absent.
///
/// # Errors
///
/// Rejects non-numeric, negative, and non-finite values.
pub fn parse_bottom_margin(raw: Option<&str>) -> Result<f64, LayoutError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_BOTTOM_MARGIN_PX);
    };
    match raw.trim().parse::<f64>() {
        Ok(margin) if margin.is_finite() && margin >= 0.0 => Ok(margin),
        _ => Err(LayoutError::ConfigParse(format!("invalid {BOTTOM_MARGIN_ENV}: {raw}"))),
    }
}

/// Parse the unknown-section policy, defaulting to `clamp_below`.
///
/// # Errors
///
/// Rejects anything other than `clamp_below` or `keep`.
pub fn parse_unknown_section(raw: Option<&str>) -> Result<UnknownSectionPolicy, LayoutError> {
    match raw.map_or("clamp_below", str::trim) {
        "clamp_below" => Ok(UnknownSectionPolicy::ClampBelow),
        "keep" => Ok(UnknownSectionPolicy::Keep),
        other => Err(LayoutError::ConfigParse(format!(
            "unknown {UNKNOWN_SECTION_ENV} '{other}' (expected 'clamp_below' or 'keep')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
