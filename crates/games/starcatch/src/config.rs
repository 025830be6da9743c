use std::fmt;

use serde::{Deserialize, Serialize};

/// Horizontal run speed (units/s).
pub const RUN_SPEED: f32 = 160.0;
/// Upward velocity applied by a grounded jump.
pub const JUMP_IMPULSE: f32 = 330.0;
/// Score awarded per star.
pub const PICKUP_REWARD: u32 = 10;
/// Stars in the row.
pub const PICKUP_COUNT: usize = 19;

/// Player tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub bounce: f32,
    pub scale: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            run_speed: RUN_SPEED,
            jump_impulse: JUMP_IMPULSE,
            start_x: 100.0,
            start_y: 450.0,
            bounce: 0.2,
            scale: 1.2,
        }
    }
}

/// The star row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub count: usize,
    pub first_x: f32,
    pub top_y: f32,
    pub step_x: f32,
    /// Vertical bounce is drawn uniformly from `bounce_min..=bounce_max`.
    pub bounce_min: f32,
    pub bounce_max: f32,
    pub reward: u32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            count: PICKUP_COUNT,
            first_x: 12.0,
            top_y: 0.0,
            step_x: 70.0,
            bounce_min: 0.4,
            bounce_max: 0.8,
            reward: PICKUP_REWARD,
        }
    }
}

/// Bomb spawning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    /// Bombs added each time the star row is cleared.
    pub batch_size: usize,
    pub spawn_y: f32,
    /// Horizontal launch speed is an integer drawn from `-max_speed_x..=max_speed_x`.
    pub max_speed_x: i32,
    pub fall_speed: f32,
    pub bounce: f32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            spawn_y: 16.0,
            max_speed_x: 200,
            fall_speed: 20.0,
            bounce: 1.0,
        }
    }
}

/// How touch input is read on touch-capable devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchMode {
    /// Tap the left or right half of the screen to run that way.
    #[default]
    ScreenHalves,
    /// On-screen left, right, and jump buttons.
    Buttons,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub touch_mode: TouchMode,
    /// Side length of the square on-screen buttons.
    pub button_size: f32,
    /// Gap between a button and the screen edge.
    pub button_margin: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            touch_mode: TouchMode::ScreenHalves,
            button_size: 96.0,
            button_margin: 24.0,
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarCatchConfig {
    pub player: PlayerConfig,
    pub pickups: PickupConfig,
    pub hazards: HazardConfig,
    pub input: InputConfig,
    /// Delay between a bomb hit and the automatic restart.
    pub restart_delay_ms: u64,
    /// Downward gravity handed to the physics host.
    pub gravity_y: f32,
    /// RNG seed. A fresh OS seed is used when absent.
    pub seed: Option<u64>,
}

impl Default for StarCatchConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl StarCatchConfig {
    /// Keyboard variant: three bombs per cleared row, half-second restart.
    pub fn classic() -> Self {
        Self {
            player: PlayerConfig::default(),
            pickups: PickupConfig::default(),
            hazards: HazardConfig::default(),
            input: InputConfig::default(),
            restart_delay_ms: 500,
            gravity_y: 300.0,
            seed: None,
        }
    }

    /// Touch-button variant: one bomb per cleared row, two-second restart.
    pub fn touch() -> Self {
        let mut config = Self::classic();
        config.hazards.batch_size = 1;
        config.restart_delay_ms = 2000;
        config.input.touch_mode = TouchMode::Buttons;
        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `STARCATCH_CONFIG` or `config/starcatch.toml`.
    /// Falls back to the classic preset if the file is missing or invalid.
    pub fn load() -> Self {
        let path = std::env::var("STARCATCH_CONFIG")
            .unwrap_or_else(|_| "config/starcatch.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!(%path, "Loaded game configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pickups.count == 0 {
            return Err(ConfigError::Invalid("pickups.count must be > 0".into()));
        }
        let (lo, hi) = (self.pickups.bounce_min, self.pickups.bounce_max);
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(ConfigError::Invalid(
                "pickups.bounce_min..=bounce_max must be a finite, non-empty range".into(),
            ));
        }
        if self.hazards.max_speed_x < 0 {
            return Err(ConfigError::Invalid("hazards.max_speed_x must be >= 0".into()));
        }
        let (run, jump) = (self.player.run_speed, self.player.jump_impulse);
        if !run.is_finite() || !jump.is_finite() || run <= 0.0 || jump <= 0.0 {
            return Err(ConfigError::Invalid(
                "player.run_speed and player.jump_impulse must be finite and > 0".into(),
            ));
        }
        if !self.input.button_size.is_finite() || self.input.button_size <= 0.0 {
            return Err(ConfigError::Invalid("input.button_size must be > 0".into()));
        }
        if self.hazards.batch_size == 0 {
            tracing::warn!("hazards.batch_size is 0, clearing the stars will never spawn bombs");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(m) => write!(f, "parse error: {m}"),
            Self::Invalid(m) => write!(f, "invalid config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {}
