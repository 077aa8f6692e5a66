//! Mapper configuration.
//!
//! [`MapperConfig`] bundles the curve parameters with the pipeline switches
//! (mode, compression, lookup, encoding, overlay). It loads from YAML; any
//! key left out takes its default.
//!
//! # Example
//!
//! ```rust
//! use gamut_map::{MapMode, MapperConfig};
//!
//! let config = MapperConfig::from_yaml_str(r#"
//! curve:
//!   slope: 1.8
//!   min_exposure: -7.0
//!   max_exposure: 5.7
//! mode: per_channel
//! encoding:
//!   type: srgb
//! "#).unwrap();
//!
//! assert_eq!(config.mode, MapMode::PerChannel);
//! assert_eq!(config.table_size, 1024);
//! ```

use std::path::Path;
use std::str::FromStr;

use gamut_core::PixelLayout;
use gamut_curve::{CurveConfig, LookupMode, SampleSpacing, DEFAULT_TABLE_SIZE};
use gamut_transfer::{gamma, pq, srgb};
use serde::{Deserialize, Serialize};

use crate::{MapError, MapResult};

/// How the curve is applied to a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapMode {
    /// Tone-map the max channel once and rescale by the chromaticity ratio.
    #[default]
    MaxRgb,
    /// Tone-map each channel on its own. Can shift hue.
    PerChannel,
}

impl FromStr for MapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "max_rgb" | "maxrgb" => Ok(Self::MaxRgb),
            "per_channel" | "perchannel" => Ok(Self::PerChannel),
            other => Err(format!("unknown map mode '{other}'")),
        }
    }
}

/// Shape of the ratio blend toward white above the latitude threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionFalloff {
    /// Blend weight grows linearly with the excess.
    #[default]
    Linear,
    /// Blend weight follows a smoothstep of the excess.
    Smoothstep,
}

impl FromStr for CompressionFalloff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "smoothstep" | "smooth" => Ok(Self::Smoothstep),
            other => Err(format!("unknown compression falloff '{other}'")),
        }
    }
}

/// Final encoding of the remapped display value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayEncoding {
    /// No encoding.
    #[default]
    Linear,
    /// Pure 2.2 power law.
    Gamma22,
    /// IEC 61966-2-1 two-part curve.
    Srgb,
    /// SMPTE ST 2084, display value 1.0 at `max_nits`.
    Pq {
        /// Peak luminance in cd/m2.
        max_nits: f32,
    },
}

impl DisplayEncoding {
    /// Encodes one display-linear value in [0, 1].
    #[inline]
    pub fn encode(self, v: f32) -> f32 {
        match self {
            DisplayEncoding::Linear => v,
            DisplayEncoding::Gamma22 => gamma::oetf_22(v),
            DisplayEncoding::Srgb => srgb::oetf(v),
            DisplayEncoding::Pq { max_nits } => pq::oetf(v * max_nits),
        }
    }

    /// Inverse of [`encode`](Self::encode).
    #[inline]
    pub fn decode(self, v: f32) -> f32 {
        match self {
            DisplayEncoding::Linear => v,
            DisplayEncoding::Gamma22 => gamma::eotf_22(v),
            DisplayEncoding::Srgb => srgb::eotf(v),
            DisplayEncoding::Pq { max_nits } => pq::eotf(v) / max_nits,
        }
    }
}

impl FromStr for DisplayEncoding {
    type Err = String;

    /// Parses `linear`, `gamma22`, `srgb`, `pq` or `pq:<nits>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.split_once(':') {
            Some(("pq", nits)) => nits
                .parse::<f32>()
                .map(|max_nits| Self::Pq { max_nits })
                .map_err(|e| format!("invalid pq peak '{nits}': {e}")),
            Some(_) => Err(format!("unknown display encoding '{s}'")),
            None => match lower.as_str() {
                "linear" => Ok(Self::Linear),
                "gamma22" | "gamma" => Ok(Self::Gamma22),
                "srgb" => Ok(Self::Srgb),
                "pq" => Ok(Self::Pq { max_nits: 1000.0 }),
                _ => Err(format!("unknown display encoding '{s}'")),
            },
        }
    }
}

/// Full configuration of a [`crate::GamutMapper`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Tone-curve parameters.
    pub curve: CurveConfig,
    /// Max-RGB or per-channel mapping.
    pub mode: MapMode,
    /// Chromaticity compression toward white above the latitude threshold.
    pub compression: bool,
    /// Blend shape for compression.
    pub falloff: CompressionFalloff,
    /// Sample-table lookup mode.
    pub lookup: LookupMode,
    /// Sample-table abscissa distribution.
    pub spacing: SampleSpacing,
    /// Samples per table.
    pub table_size: usize,
    /// Output encoding.
    pub encoding: DisplayEncoding,
    /// Paint out-of-range input red (below) or green (above).
    pub debug_overlay: bool,
    /// Buffer channel layout.
    pub layout: PixelLayout,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            curve: CurveConfig::default(),
            mode: MapMode::MaxRgb,
            compression: true,
            falloff: CompressionFalloff::Linear,
            lookup: LookupMode::Bilinear,
            spacing: SampleSpacing::Log2,
            table_size: DEFAULT_TABLE_SIZE,
            encoding: DisplayEncoding::Linear,
            debug_overlay: false,
            layout: PixelLayout::Rgb,
        }
    }
}

impl MapperConfig {
    /// Loads and validates a config file.
    pub fn from_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MapError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> MapResult<Self> {
        let config: MapperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> MapResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Sets the mapping mode.
    pub fn with_mode(mut self, mode: MapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables chromaticity compression.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Sets the curve parameters.
    pub fn with_curve(mut self, curve: CurveConfig) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the output encoding.
    pub fn with_encoding(mut self, encoding: DisplayEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Enables or disables the debug overlay.
    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Sets the buffer layout.
    pub fn with_layout(mut self, layout: PixelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Checks curve parameters and pipeline settings.
    pub fn validate(&self) -> MapResult<()> {
        self.curve.validate()?;
        if self.table_size < 2 {
            return Err(MapError::InvalidConfig(format!(
                "table size {} must be at least 2",
                self.table_size
            )));
        }
        match self.encoding {
            DisplayEncoding::Pq { max_nits } if !(max_nits > 0.0 && max_nits <= pq::L_MAX) => {
                Err(MapError::InvalidConfig(format!(
                    "pq peak {max_nits} outside (0, {}]",
                    pq::L_MAX
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = MapperConfig::default();
        c.validate().unwrap();
        assert_eq!(c.mode, MapMode::MaxRgb);
        assert!(c.compression);
        assert_eq!(c.lookup, LookupMode::Bilinear);
        assert_eq!(c.spacing, SampleSpacing::Log2);
        assert_eq!(c.encoding, DisplayEncoding::Linear);
        assert!(!c.debug_overlay);
    }

    #[test]
    fn test_partial_yaml() {
        let c = MapperConfig::from_yaml_str("compression: false\n").unwrap();
        assert!(!c.compression);
        assert_eq!(c.curve, CurveConfig::default());
    }

    #[test]
    fn test_yaml_pq() {
        let c = MapperConfig::from_yaml_str("encoding:\n  type: pq\n  max_nits: 1000.0\n").unwrap();
        assert_eq!(c.encoding, DisplayEncoding::Pq { max_nits: 1000.0 });
    }

    #[test]
    fn test_yaml_roundtrip() {
        let c = MapperConfig::default()
            .with_mode(MapMode::PerChannel)
            .with_encoding(DisplayEncoding::Srgb);
        let text = c.to_yaml_string().unwrap();
        assert_eq!(MapperConfig::from_yaml_str(&text).unwrap(), c);
    }

    #[test]
    fn test_yaml_rejects_invalid_curve() {
        let err = MapperConfig::from_yaml_str("curve:\n  slope: 0.0\n").unwrap_err();
        assert!(matches!(err, MapError::Curve(_)));
    }

    #[test]
    fn test_yaml_syntax_error() {
        assert!(matches!(
            MapperConfig::from_yaml_str("mode: [").unwrap_err(),
            MapError::Yaml(_)
        ));
    }

    #[test]
    fn test_table_size_bound() {
        let c = MapperConfig { table_size: 1, ..Default::default() };
        assert!(matches!(c.validate(), Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "curve:\n  slope: 3.0\nlookup: nearest").unwrap();
        let c = MapperConfig::from_file(file.path()).unwrap();
        assert_relative_eq!(c.curve.slope, 3.0);
        assert_eq!(c.lookup, LookupMode::Nearest);
    }

    #[test]
    fn test_missing_file() {
        let err = MapperConfig::from_file("/nonexistent/gamut.yaml").unwrap_err();
        assert!(matches!(err, MapError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("per-channel".parse::<MapMode>().unwrap(), MapMode::PerChannel);
        assert_eq!("pq:4000".parse::<DisplayEncoding>().unwrap(), DisplayEncoding::Pq { max_nits: 4000.0 });
        assert_eq!("sRGB".parse::<DisplayEncoding>().unwrap(), DisplayEncoding::Srgb);
        assert!("log".parse::<DisplayEncoding>().is_err());
        assert_eq!("smooth".parse::<CompressionFalloff>().unwrap(), CompressionFalloff::Smoothstep);
    }

    #[test]
    fn test_encoding_roundtrip() {
        for enc in [
            DisplayEncoding::Linear,
            DisplayEncoding::Gamma22,
            DisplayEncoding::Srgb,
            DisplayEncoding::Pq { max_nits: 1000.0 },
        ] {
            for v in [0.01_f32, 0.18, 0.5, 1.0] {
                assert_relative_eq!(enc.decode(enc.encode(v)), v, max_relative = 1e-3);
            }
        }
    }
}
