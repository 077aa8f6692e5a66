//! CLI command implementations

pub mod curve;
pub mod lut;
pub mod pixel;

use anyhow::{Context, Result, anyhow};
use gamut_core::Point2;
use gamut_map::{GamutMapper, MapperConfig};
use std::str::FromStr;

use crate::ParamArgs;

fn parse_flag<T>(name: &str, value: &Option<String>) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    value
        .as_deref()
        .map(|s| T::from_str(s).map_err(|e| anyhow!("--{name}: {e}")))
        .transpose()
}

/// Loads `--config` if given and applies flag overrides.
pub fn build_config(params: &ParamArgs) -> Result<MapperConfig> {
    let mut config = match &params.config {
        Some(path) => MapperConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MapperConfig::default(),
    };

    let curve = &mut config.curve;
    if let Some(v) = params.slope {
        curve.slope = v;
    }
    if let Some(v) = params.min_exposure {
        curve.min_exposure = v;
    }
    if let Some(v) = params.max_exposure {
        curve.max_exposure = v;
    }
    if let Some(v) = params.grey {
        curve.mid_grey = Point2::splat(v);
    }
    if let Some(v) = params.latitude {
        curve.max_latitude = v;
    }

    if let Some(v) = parse_flag("mode", &params.mode)? {
        config.mode = v;
    }
    if let Some(v) = parse_flag("falloff", &params.falloff)? {
        config.falloff = v;
    }
    if let Some(v) = parse_flag("lookup", &params.lookup)? {
        config.lookup = v;
    }
    if let Some(v) = parse_flag("spacing", &params.spacing)? {
        config.spacing = v;
    }
    if let Some(v) = parse_flag("encoding", &params.encoding)? {
        config.encoding = v;
    }
    if let Some(v) = params.table_size {
        config.table_size = v;
    }
    if params.no_compression {
        config.compression = false;
    }
    if params.debug_overlay {
        config.debug_overlay = true;
    }

    config.validate().context("Invalid parameters")?;
    Ok(config)
}

/// Builds the mapper for a command.
pub fn build_mapper(config: MapperConfig) -> Result<GamutMapper> {
    GamutMapper::new(config).context("Failed to build curve")
}

/// Prints the effective configuration.
pub fn show_config(config: &MapperConfig) -> Result<()> {
    print!("{}", config.to_yaml_string()?);
    Ok(())
}
