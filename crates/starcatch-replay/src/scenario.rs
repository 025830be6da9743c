//! Scripted sessions in TOML.
//!
//! ```toml
//! variant = "classic"
//! seed = 7
//!
//! [[steps]]
//! action = "key_down"
//! key = "right"
//!
//! [[steps]]
//! action = "tick"
//! count = 30
//!
//! [[steps]]
//! action = "collect_all"
//!
//! [expect]
//! score = 190
//! hazards = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use starcatch::config::StarCatchConfig;
use starcatch_core::engine::Viewport;
use starcatch_core::input::{Direction, PointerId};

use crate::error::ScenarioError;

/// Which preset the scenario plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Classic,
    Touch,
    /// Whatever `STARCATCH_CONFIG` or `config/starcatch.toml` holds.
    Configured,
}

impl Variant {
    pub fn config(self) -> StarCatchConfig {
        match self {
            Variant::Classic => StarCatchConfig::classic(),
            Variant::Touch => StarCatchConfig::touch(),
            Variant::Configured => StarCatchConfig::load(),
        }
    }
}

/// Slowest frame rate a scenario may tick at.
pub const MIN_TICK_HZ: f32 = 1.0;

fn one() -> usize {
    1
}

/// One scripted host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    KeyDown {
        key: Direction,
    },
    KeyUp {
        key: Direction,
    },
    PointerDown {
        id: PointerId,
        x: f32,
        y: f32,
    },
    PointerUp {
        id: PointerId,
        x: f32,
        y: f32,
    },
    /// Render `count` frames at the scenario tick rate.
    Tick {
        #[serde(default = "one")]
        count: usize,
    },
    /// Let wall-clock time pass without rendering a frame.
    Wait {
        ms: u64,
    },
    /// Put the player at rest on a platform at `x`.
    Ground {
        x: f32,
    },
    /// The player overlaps star `index`.
    Collect {
        index: usize,
    },
    /// The player overlaps every star that is still active.
    CollectAll,
    /// Bomb `index` touches the player.
    HitHazard {
        #[serde(default)]
        index: usize,
    },
    /// Bomb `index` bounces off the ground.
    HazardLand {
        #[serde(default)]
        index: usize,
    },
    Resize {
        width: f32,
        height: f32,
    },
}

/// Assertions checked against the final outcome. Absent fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expectation {
    pub score: Option<u32>,
    pub frozen: Option<bool>,
    pub hazards: Option<usize>,
    pub generation: Option<u64>,
    pub active_pickups: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub variant: Variant,
    /// RNG seed. Scenarios are always seeded so runs are reproducible.
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub touch: bool,
    pub tick_hz: f32,
    pub steps: Vec<Step>,
    pub expect: Option<Expectation>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            seed: 1,
            width: 1600.0,
            height: 900.0,
            touch: false,
            tick_hz: 60.0,
            steps: Vec::new(),
            expect: None,
        }
    }
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), steps = scenario.steps.len(), "Loaded scenario");
        Ok(scenario)
    }

    /// Frame time must fit a `Duration`, and every viewport must be a finite,
    /// non-empty area for the spawner to sample from.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.tick_hz.is_finite() && self.tick_hz >= MIN_TICK_HZ) {
            return Err(ScenarioError::Invalid(format!(
                "tick_hz must be finite and >= {MIN_TICK_HZ}, got {}",
                self.tick_hz
            )));
        }
        let sizes = std::iter::once((self.width, self.height)).chain(self.steps.iter().filter_map(
            |s| match s {
                Step::Resize { width, height } => Some((*width, *height)),
                _ => None,
            },
        ));
        for (w, h) in sizes {
            if !Viewport::new(w, h).is_usable() {
                return Err(ScenarioError::Invalid(format!(
                    "viewport {w}x{h} must be finite and positive"
                )));
            }
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// The game configuration this scenario plays under.
    pub fn config(&self) -> StarCatchConfig {
        self.variant.config().with_seed(self.seed)
    }

    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz
    }
}
