//! Immutable harness configuration.
//!
//! A `ProbeConfig` is built once at startup (defaults, then an optional JSON
//! file, then command-line overrides), validated, and passed by reference to
//! every setup routine. Nothing mutates it afterwards.

use crate::error::ProbeError;
use crate::shaders::ShaderSources;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default window and offscreen attachment width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default window and offscreen attachment height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;
/// Default window title.
pub const DEFAULT_TITLE: &str = "Shader test";

/// An OpenGL context version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    /// The oldest version whose core profile runs the embedded shaders.
    pub const MINIMUM: GlVersion = GlVersion { major: 3, minor: 3 };

    /// Returns true if `self` is `other` or newer.
    pub fn at_least(self, other: GlVersion) -> bool {
        (self.major, self.minor) >= (other.major, other.minor)
    }
}

impl Default for GlVersion {
    fn default() -> Self {
        Self::MINIMUM
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Everything the harness needs to know before it opens a window.
///
/// `width` and `height` size both the window and the two offscreen
/// attachments. `frame_limit` requests close after that many frames, which
/// is how unattended runs end without an exit key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub gl_version: GlVersion,
    pub clear_color: [f32; 4],
    pub frame_limit: Option<u64>,
    #[serde(skip)]
    pub shaders: ShaderSources,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            gl_version: GlVersion::MINIMUM,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            frame_limit: None,
            shaders: ShaderSources::EMBEDDED,
        }
    }
}

impl ProbeConfig {
    /// Parses a (possibly partial) JSON object over the defaults and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::InvalidConfig` if the JSON is malformed, names an
    /// unknown field, or describes an invalid configuration.
    pub fn from_json(json: &str) -> Result<Self, ProbeError> {
        let config: ProbeConfig = serde_json::from_str(json)
            .map_err(|e| ProbeError::InvalidConfig(format!("config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration (shader sources excluded) as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, ProbeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ProbeError::InvalidConfig(format!("config JSON: {e}")))
    }

    /// Checks the values the pipeline depends on.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.width == 0 || self.height == 0 {
            return Err(ProbeError::InvalidConfig(format!(
                "width and height must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(ProbeError::InvalidConfig(format!(
                "size {}x{} does not fit a GL viewport",
                self.width, self.height
            )));
        }
        if !self.gl_version.at_least(GlVersion::MINIMUM) {
            return Err(ProbeError::InvalidConfig(format!(
                "GL {} is older than the required {}",
                self.gl_version,
                GlVersion::MINIMUM
            )));
        }
        if let Some(c) = self
            .clear_color
            .iter()
            .find(|c| !(0.0..=1.0).contains(*c))
        {
            return Err(ProbeError::InvalidConfig(format!(
                "clear color component {c} outside [0, 1]"
            )));
        }
        if self.frame_limit == Some(0) {
            return Err(ProbeError::InvalidConfig(
                "frame limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The window size as signed GL dimensions. Only meaningful after
    /// [`validate`](Self::validate) succeeded.
    pub fn gl_size(&self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_fixed_window() {
        let c = ProbeConfig::default();
        assert_eq!((c.width, c.height), (800, 600));
        assert_eq!(c.title, "Shader test");
        assert_eq!(c.gl_version, GlVersion { major: 3, minor: 3 });
        assert_eq!(c.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(c.frame_limit, None);
        assert_eq!(c.shaders, ShaderSources::EMBEDDED);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_size_is_rejected() {
        let c = ProbeConfig {
            width: 0,
            ..ProbeConfig::default()
        };
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("non-zero"), "got: {err}");
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let c = ProbeConfig {
            height: u32::MAX,
            ..ProbeConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn old_gl_version_is_rejected() {
        let c = ProbeConfig {
            gl_version: GlVersion { major: 3, minor: 2 },
            ..ProbeConfig::default()
        };
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("3.2"), "got: {err}");
    }

    #[test]
    fn newer_gl_version_is_accepted() {
        let c = ProbeConfig {
            gl_version: GlVersion { major: 4, minor: 1 },
            ..ProbeConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn out_of_range_clear_color_is_rejected() {
        let c = ProbeConfig {
            clear_color: [0.0, 1.5, 0.0, 1.0],
            ..ProbeConfig::default()
        };
        assert!(c.validate().is_err());

        let nan = ProbeConfig {
            clear_color: [f32::NAN, 0.0, 0.0, 1.0],
            ..ProbeConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn zero_frame_limit_is_rejected() {
        let c = ProbeConfig {
            frame_limit: Some(0),
            ..ProbeConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = ProbeConfig::from_json(r#"{"width": 320, "frame_limit": 3}"#).unwrap();
        assert_eq!(c.width, 320);
        assert_eq!(c.height, DEFAULT_HEIGHT);
        assert_eq!(c.frame_limit, Some(3));
        assert_eq!(c.title, DEFAULT_TITLE);
    }

    #[test]
    fn unknown_json_field_is_rejected() {
        let err = ProbeConfig::from_json(r#"{"widht": 320}"#).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidConfig(_)));
    }

    #[test]
    fn invalid_json_values_fail_validation() {
        assert!(ProbeConfig::from_json(r#"{"height": 0}"#).is_err());
    }

    #[test]
    fn json_output_omits_shader_sources() {
        let json = ProbeConfig::default().to_json_pretty().unwrap();
        assert!(json.contains("\"width\": 800"), "got: {json}");
        assert!(!json.contains("shaders"), "got: {json}");
        let back = ProbeConfig::from_json(&json).unwrap();
        assert_eq!(back, ProbeConfig::default());
    }

    #[test]
    fn gl_version_ordering() {
        let v33 = GlVersion::MINIMUM;
        assert!(GlVersion { major: 4, minor: 0 }.at_least(v33));
        assert!(v33.at_least(v33));
        assert!(!GlVersion { major: 2, minor: 9 }.at_least(v33));
        assert_eq!(v33.to_string(), "3.3");
    }
}
