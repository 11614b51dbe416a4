//! Store configuration
//!
//! Configuration is loaded from environment variables:
//! - `SLDC_ALPHA_MASK`: mask crop pixels outside the polygon (default `true`)
//! - `SLDC_CLAMP_CROPS`: clip crop windows to the image instead of failing (default `true`)

use std::env;

/// Main store configuration
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Crop extraction configuration
    pub crop: CropConfig,
}

/// Crop-related configuration
#[derive(Debug, Clone)]
pub struct CropConfig {
    /// Set alpha to 0 for pixels whose centre lies outside the polygon
    pub alpha_mask: bool,
    /// Clip windows that overflow the image; when false an overflow is an error
    pub clamp_to_bounds: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            alpha_mask: true,
            clamp_to_bounds: true,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("SLDC_ALPHA_MASK")
            && let Some(flag) = parse_flag(&val)
        {
            config.crop.alpha_mask = flag;
        }
        if let Some(val) = lookup("SLDC_CLAMP_CROPS")
            && let Some(flag) = parse_flag(&val)
        {
            config.crop.clamp_to_bounds = flag;
        }

        config
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
