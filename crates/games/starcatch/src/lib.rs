pub mod collision;
pub mod config;
pub mod input;
pub mod player;
pub mod scoring;
pub mod session;
pub mod world;

use rand::SeedableRng;
use rand::rngs::StdRng;

use starcatch_core::engine::{Engine, TimerId, Viewport};
use starcatch_core::events::{Contact, GameEvent};
use starcatch_core::game_trait::{ArcadeGame, GameMetadata};
use starcatch_core::input::{InputCapabilities, InputEvent};

use collision::dispatch;
use config::{ConfigError, StarCatchConfig};
use input::InputController;
use session::GameSession;

/// Star Catch: run and jump across the ledges collecting stars; every cleared
/// row brings more bouncing bombs.
pub struct StarCatch {
    config: StarCatchConfig,
    viewport: Viewport,
    rng: StdRng,
    controller: InputController,
    session: Option<GameSession>,
}

impl StarCatch {
    /// Build a game from `config`. The config is validated here, before any
    /// of its ranges reach the spawner.
    pub fn new(config: StarCatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: StarCatchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let viewport = Viewport::default();
        Self {
            controller: InputController::new(InputCapabilities::default(), &config.input, viewport),
            config,
            viewport,
            rng,
            session: None,
        }
    }

    pub fn config(&self) -> &StarCatchConfig {
        &self.config
    }

    /// The live session. `None` until `init`.
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Viewport the next scene will be built against.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn controller(&self) -> &InputController {
        &self.controller
    }

    /// Decode a snapshot produced by [`ArcadeGame::serialize_state`].
    pub fn decode_state(data: &[u8]) -> Result<GameSession, rmp_serde::decode::Error> {
        rmp_serde::from_slice(data)
    }
}

impl Default for StarCatch {
    fn default() -> Self {
        Self::with_valid_config(StarCatchConfig::default())
    }
}

impl ArcadeGame for StarCatch {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Star Catch".to_string(),
            description: "Collect every star, then dodge the bombs they release!".to_string(),
        }
    }

    fn init(&mut self, viewport: Viewport, caps: InputCapabilities, engine: &mut dyn Engine) {
        let viewport = if viewport.is_usable() {
            viewport
        } else {
            tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                "Unusable viewport at init, keeping {}x{}",
                self.viewport.width,
                self.viewport.height
            );
            self.viewport
        };
        self.viewport = viewport;
        self.controller = InputController::new(caps, &self.config.input, viewport);
        self.session = Some(GameSession::start(
            0,
            viewport,
            &self.config,
            engine,
            &mut self.rng,
        ));
        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            touch = caps.touch,
            hazard_batch = self.config.hazards.batch_size,
            "Star Catch initialized"
        );
    }

    fn handle_input(&mut self, event: &InputEvent) {
        self.controller.handle(event);
    }

    fn update(&mut self, _dt: f32, engine: &mut dyn Engine) -> Vec<GameEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.is_frozen() {
            return Vec::new();
        }

        session.world.sync(engine);
        let commands = self.controller.resolve(session.world.player.grounded_this_frame);
        session.world.player.drive(commands, &self.config.player, engine);
        Vec::new()
    }

    fn on_contact(&mut self, contact: Contact, engine: &mut dyn Engine) -> Vec<GameEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match session.world.classify(contact) {
            Some(event) => dispatch(session, event, &self.config, engine, &mut self.rng),
            None => {
                tracing::trace!(?contact, "Unclassified contact");
                Vec::new()
            },
        }
    }

    fn on_timer(&mut self, timer: TimerId, engine: &mut dyn Engine) -> Vec<GameEvent> {
        let Some(command) = self.session.as_mut().and_then(|s| s.take_restart(timer)) else {
            tracing::debug!(timer = timer.0, "Stale or unknown timer ignored");
            return Vec::new();
        };

        let next = command.execute(self.viewport, &self.config, engine, &mut self.rng);
        let generation = next.generation;
        self.session = Some(next);
        self.controller.clear_requests();
        tracing::info!(generation, "Scene restarted");
        vec![GameEvent::Restarted { generation }]
    }

    fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_usable() {
            tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                "Ignoring resize to an unusable viewport"
            );
            return;
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "Viewport resized, applies from the next scene"
        );
        self.viewport = viewport;
        self.controller.set_viewport(viewport);
    }

    fn serialize_state(&self) -> Vec<u8> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        match rmp_serde::to_vec(session) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode session state");
                Vec::new()
            },
        }
    }

    fn is_frozen(&self) -> bool {
        self.session.as_ref().is_some_and(GameSession::is_frozen)
    }

    fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.score.value())
    }
}
