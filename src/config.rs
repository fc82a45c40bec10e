//! Game Configuration
//!
//! Human-facing settings in floats, loaded from JSON and the environment,
//! then frozen into fixed-point [`SessionRules`] before a session starts.
//!
//! Environment:
//! - `FRUIT_FUSION_CONFIG`: path to a JSON config file (defaults otherwise)
//! - `FRUIT_FUSION_SEED`: spawn RNG seed override

use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::fixed::to_fixed;
use crate::game::entity::BodyProfile;
use crate::game::state::{OverflowRule, Playfield, SessionRules};
use crate::game::tier::{CatalogError, TierCatalog, TierSpec};

/// Config file path variable.
pub const CONFIG_PATH_ENV: &str = "FRUIT_FUSION_CONFIG";

/// Seed override variable.
pub const SEED_ENV: &str = "FRUIT_FUSION_SEED";

/// Largest coordinate a Q16.16 value holds comfortably.
const MAX_COORD: f64 = 16_384.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`GameConfig`].
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Tier table did not validate.
    #[error("invalid tier table: {0}")]
    Catalog(#[from] CatalogError),

    /// A numeric setting is out of range.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// One row of the tier table, sized relative to the base fruit size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Tier name
    pub name: String,
    /// Display size as a multiple of the base fruit size
    pub size_scale: f64,
    /// Name of the fusion result, absent for the top tier
    #[serde(default)]
    pub successor: Option<String>,
}

impl TierConfig {
    fn new(name: &str, size_scale: f64, successor: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            size_scale,
            successor: successor.map(str::to_string),
        }
    }
}

/// Playfield geometry in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
    /// y-coordinate aiming fruits are held at
    pub entry_y: f64,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            entry_y: 40.0,
        }
    }
}

/// Rigid body settings in floats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Restitution
    pub bounce: f64,
    /// Linear drag
    pub drag: f64,
    /// Angular drag
    pub angular_drag: f64,
    /// Friction
    pub friction: f64,
    /// Keep bodies inside the playfield
    pub collide_world_bounds: bool,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            bounce: 0.5,
            drag: 0.0,
            angular_drag: 0.0,
            friction: 0.0,
            collide_world_bounds: true,
        }
    }
}

/// Overflow watchdog settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverflowConfig {
    /// Watchdog on/off
    pub enabled: bool,
    /// Overflow line y
    pub line_y: f64,
    /// Syncs before a fruit can trip the watchdog
    pub grace_steps: u32,
}

impl Default for OverflowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            line_y: 80.0,
            grace_steps: 60,
        }
    }
}

/// Full game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Geometry
    pub playfield: PlayfieldConfig,
    /// Base fruit size; 4% of the playfield width when unset
    pub base_fruit_size: Option<f64>,
    /// Tier table, smallest first
    pub tiers: Vec<TierConfig>,
    /// How many of the smallest tiers can spawn
    pub spawnable_count: usize,
    /// Body settings
    pub body: BodyConfig,
    /// Fusion flash lifetime in milliseconds
    pub fusion_effect_ms: u32,
    /// Overflow watchdog
    pub overflow: OverflowConfig,
    /// Fixed spawn seed; a fresh one per session when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let tiers = vec![
            TierConfig::new("apple", 1.0, Some("cherry")),
            TierConfig::new("cherry", 1.3, Some("cutie")),
            TierConfig::new("cutie", 1.5, Some("strawberry")),
            TierConfig::new("strawberry", 1.7, Some("grapes")),
            TierConfig::new("grapes", 1.9, Some("mango")),
            TierConfig::new("mango", 2.0, Some("orange")),
            TierConfig::new("orange", 2.2, Some("peach")),
            TierConfig::new("peach", 2.4, Some("pineapple")),
            TierConfig::new("pineapple", 2.6, Some("honeydew")),
            TierConfig::new("honeydew", 2.8, Some("watermelon")),
            TierConfig::new("watermelon", 4.0, None),
        ];
        Self {
            playfield: PlayfieldConfig::default(),
            base_fruit_size: None,
            tiers,
            spawnable_count: 4,
            body: BodyConfig::default(),
            fusion_effect_ms: 100,
            overflow: OverflowConfig::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load from `FRUIT_FUSION_CONFIG` and `FRUIT_FUSION_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(
            std::env::var(CONFIG_PATH_ENV).ok(),
            std::env::var(SEED_ENV).ok(),
        )
    }

    /// Load from an optional config path and an optional seed string.
    pub fn from_sources(path: Option<String>, seed: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(raw) = seed {
            let seed = raw.trim().parse::<u64>().map_err(|_| {
                warn!("Rejected {}={:?}", SEED_ENV, raw);
                ConfigError::InvalidValue(format!("{} must be an unsigned integer", SEED_ENV))
            })?;
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Parse JSON. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Effective base fruit size.
    pub fn base_size(&self) -> f64 {
        self.base_fruit_size.unwrap_or(self.playfield.width * 0.04)
    }

    /// Check numeric ranges. Tier table structure is checked by
    /// [`build_catalog`](Self::build_catalog).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.playfield;
        check_coord("playfield.width", pf.width, false)?;
        check_coord("playfield.height", pf.height, false)?;
        check_coord("playfield.entry_y", pf.entry_y, true)?;
        if pf.entry_y > pf.height {
            return Err(invalid("playfield.entry_y is below the playfield"));
        }

        check_coord("base_fruit_size", self.base_size(), false)?;
        for tier in &self.tiers {
            let size = self.base_size() * tier.size_scale;
            if !(size.is_finite() && size > 0.0 && size < MAX_COORD) {
                return Err(invalid(&format!("tier {} has size {}", tier.name, size)));
            }
        }

        let body = &self.body;
        for (name, value) in [
            ("body.bounce", body.bounce),
            ("body.drag", body.drag),
            ("body.angular_drag", body.angular_drag),
            ("body.friction", body.friction),
        ] {
            if !(value.is_finite() && (0.0..=MAX_COORD).contains(&value)) {
                return Err(invalid(&format!("{} = {}", name, value)));
            }
        }

        if self.overflow.enabled {
            check_coord("overflow.line_y", self.overflow.line_y, true)?;
        }
        Ok(())
    }

    /// Build the validated tier catalog.
    pub fn build_catalog(&self) -> Result<TierCatalog, ConfigError> {
        let base = self.base_size();
        let specs: Vec<TierSpec> = self
            .tiers
            .iter()
            .map(|t| TierSpec::new(&t.name, to_fixed(base * t.size_scale), t.successor.as_deref()))
            .collect();

        TierCatalog::new(&specs, self.spawnable_count).map_err(|e| {
            warn!("Rejected tier table: {}", e);
            ConfigError::Catalog(e)
        })
    }

    /// Freeze into fixed-point session rules.
    pub fn build_rules(&self) -> Result<SessionRules, ConfigError> {
        self.validate()?;
        let catalog = self.build_catalog()?;
        let pf = &self.playfield;
        let body = &self.body;

        Ok(SessionRules {
            catalog,
            playfield: Playfield {
                width: to_fixed(pf.width),
                height: to_fixed(pf.height),
                entry_y: to_fixed(pf.entry_y),
            },
            body: BodyProfile {
                bounce: to_fixed(body.bounce),
                drag: to_fixed(body.drag),
                angular_drag: to_fixed(body.angular_drag),
                friction: to_fixed(body.friction),
                collide_world_bounds: body.collide_world_bounds,
            },
            fusion_effect_ms: self.fusion_effect_ms,
            overflow: self.overflow.enabled.then(|| OverflowRule {
                line_y: to_fixed(self.overflow.line_y),
                grace_steps: self.overflow.grace_steps,
            }),
        })
    }
}

fn invalid(msg: &str) -> ConfigError {
    warn!("Rejected config: {}", msg);
    ConfigError::InvalidValue(msg.to_string())
}

fn check_coord(name: &str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    let positive = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && positive && value < MAX_COORD {
        Ok(())
    } else {
        Err(invalid(&format!("{} = {}", name, value)))
    }
}
