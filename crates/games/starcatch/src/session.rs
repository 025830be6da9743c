use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use starcatch_core::engine::{Engine, HudText, SoundId, TimerId, Viewport};

use crate::config::StarCatchConfig;
use crate::scoring::Score;
use crate::world::{World, initialize_world};

/// Round state. There is no terminal state; Frozen always leads back to Playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Playing,
    Frozen,
}

/// The delayed restart armed when a bomb hits. Holds only the timer it waits
/// on and the generation of the session that armed it, so a timer that
/// outlives its session can never restart the wrong one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartCommand {
    pub timer: TimerId,
    pub generation: u64,
}

impl RestartCommand {
    /// Tear down the old scene and build its replacement: a new world,
    /// Playing, score 0.
    pub fn execute(
        self,
        viewport: Viewport,
        config: &StarCatchConfig,
        engine: &mut dyn Engine,
        rng: &mut impl Rng,
    ) -> GameSession {
        engine.destroy_all();
        engine.resume();
        GameSession::start(self.generation + 1, viewport, config, engine, rng)
    }
}

/// Everything that belongs to one scene instance. Restarting replaces the
/// whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub generation: u64,
    pub world: World,
    pub score: Score,
    pub state: GameState,
    pub pending_restart: Option<RestartCommand>,
}

impl GameSession {
    pub fn start(
        generation: u64,
        viewport: Viewport,
        config: &StarCatchConfig,
        engine: &mut dyn Engine,
        rng: &mut impl Rng,
    ) -> Self {
        let world = initialize_world(viewport, config, engine, rng);
        let score = Score::default();
        engine.set_text(HudText::Score, &score.hud_text());
        Self {
            generation,
            world,
            score,
            state: GameState::Playing,
            pending_restart: None,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.state == GameState::Frozen
    }

    /// Playing -> Frozen: pause physics, show the hit, and arm the restart.
    /// Returns `None` without side effects when already frozen.
    pub fn freeze(&mut self, delay: Duration, engine: &mut dyn Engine) -> Option<RestartCommand> {
        if self.is_frozen() {
            return None;
        }
        engine.pause();
        self.world.player.defeat(engine);
        engine.play_sound(SoundId::Hit);
        self.state = GameState::Frozen;

        let command = RestartCommand {
            timer: engine.schedule_once(delay),
            generation: self.generation,
        };
        self.pending_restart = Some(command);
        Some(command)
    }

    /// Claim the pending restart if `timer` is the one this session armed.
    pub fn take_restart(&mut self, timer: TimerId) -> Option<RestartCommand> {
        match self.pending_restart {
            Some(cmd) if cmd.timer == timer && cmd.generation == self.generation => {
                self.pending_restart.take()
            },
            _ => None,
        }
    }
}
