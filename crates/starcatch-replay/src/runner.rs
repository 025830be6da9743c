use std::time::Duration;

use glam::Vec2;
use serde::Serialize;

use starcatch::StarCatch;
use starcatch_core::engine::{BodyHandle, Viewport};
use starcatch_core::events::{Contact, GameEvent};
use starcatch_core::game_trait::ArcadeGame;
use starcatch_core::headless::HeadlessEngine;
use starcatch_core::input::{InputCapabilities, InputEvent};

use crate::error::ScenarioError;
use crate::scenario::{Expectation, Scenario, Step};

/// Resting height used when a step grounds the player.
const GROUND_Y: f32 = 400.0;

/// Final state of a replayed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub score: u32,
    pub frozen: bool,
    pub generation: u64,
    pub hazards: usize,
    pub active_pickups: usize,
    pub frames: u64,
    pub elapsed_ms: u64,
    pub state_bytes: usize,
    pub events: Vec<GameEvent>,
}

impl Outcome {
    pub fn check(&self, expect: &Expectation) -> Result<(), ScenarioError> {
        fn field<T: PartialEq + std::fmt::Debug>(
            name: &str,
            expected: Option<T>,
            actual: T,
        ) -> Result<(), ScenarioError> {
            match expected {
                Some(e) if e != actual => Err(ScenarioError::Expectation(format!(
                    "{name}: expected {e:?}, got {actual:?}"
                ))),
                _ => Ok(()),
            }
        }
        field("score", expect.score, self.score)?;
        field("frozen", expect.frozen, self.frozen)?;
        field("hazards", expect.hazards, self.hazards)?;
        field("generation", expect.generation, self.generation)?;
        field("active_pickups", expect.active_pickups, self.active_pickups)?;
        Ok(())
    }
}

/// Drives a [`StarCatch`] session against the headless engine, acting as the
/// host: it owns the clock, delivers timers, and reports contacts.
pub struct Runner {
    game: StarCatch,
    engine: HeadlessEngine,
    dt: f32,
    frames: u64,
    elapsed: Duration,
    events: Vec<GameEvent>,
}

impl Runner {
    pub fn new(scenario: &Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let mut game = StarCatch::new(scenario.config())?;
        let mut engine = HeadlessEngine::new();
        game.init(
            scenario.viewport(),
            InputCapabilities {
                touch: scenario.touch,
            },
            &mut engine,
        );
        Ok(Self {
            game,
            engine,
            dt: scenario.dt(),
            frames: 0,
            elapsed: Duration::ZERO,
            events: Vec::new(),
        })
    }

    /// Play every step of `scenario` from a fresh session.
    pub fn run(scenario: &Scenario) -> Result<Outcome, ScenarioError> {
        let mut runner = Self::new(scenario)?;
        for (i, step) in scenario.steps.iter().enumerate() {
            tracing::debug!(step = i, ?step, "Replaying step");
            runner.step(step)?;
        }
        let outcome = runner.outcome();
        tracing::info!(
            score = outcome.score,
            frozen = outcome.frozen,
            generation = outcome.generation,
            frames = outcome.frames,
            "Scenario finished"
        );
        Ok(outcome)
    }

    pub fn game(&self) -> &StarCatch {
        &self.game
    }

    pub fn engine(&self) -> &HeadlessEngine {
        &self.engine
    }

    pub fn step(&mut self, step: &Step) -> Result<(), ScenarioError> {
        match *step {
            Step::KeyDown { key } => self.game.handle_input(&InputEvent::KeyDown(key)),
            Step::KeyUp { key } => self.game.handle_input(&InputEvent::KeyUp(key)),
            Step::PointerDown { id, x, y } => self.game.handle_input(&InputEvent::PointerDown {
                id,
                position: Vec2::new(x, y),
            }),
            Step::PointerUp { id, x, y } => self.game.handle_input(&InputEvent::PointerUp {
                id,
                position: Vec2::new(x, y),
            }),
            Step::Tick { count } => {
                for _ in 0..count {
                    self.tick();
                }
            },
            Step::Wait { ms } => self.advance_clock(Duration::from_millis(ms)),
            Step::Ground { x } => {
                let player = self.player()?;
                self.engine.set_position(player, Vec2::new(x, GROUND_Y));
                self.engine.set_touching_down(player, true);
            },
            Step::Collect { index } => {
                let star = self
                    .session_bodies(|s| s.world.pickups.get(index).map(|p| p.body))
                    .ok_or_else(|| ScenarioError::MissingEntity(format!("star {index}")))?;
                self.contact(star)?;
            },
            Step::CollectAll => {
                let stars = self
                    .game
                    .session()
                    .map(|s| {
                        s.world
                            .pickups
                            .iter()
                            .filter(|p| p.active)
                            .map(|p| p.body)
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                for star in stars {
                    self.contact(star)?;
                }
            },
            Step::HitHazard { index } => {
                let bomb = self.hazard(index)?;
                self.contact(bomb)?;
            },
            Step::HazardLand { index } => {
                let bomb = self.hazard(index)?;
                let ground = self
                    .session_bodies(|s| s.world.platforms.first().map(|p| p.body))
                    .ok_or_else(|| ScenarioError::MissingEntity("ground platform".into()))?;
                let events = self.game.on_contact(Contact::new(bomb, ground), &mut self.engine);
                self.events.extend(events);
            },
            Step::Resize { width, height } => self.game.resize(Viewport::new(width, height)),
        }
        Ok(())
    }

    /// One rendered frame: the clock moves, due timers fire, then the game updates.
    fn tick(&mut self) {
        self.advance_clock(Duration::from_secs_f32(self.dt));
        let events = self.game.update(self.dt, &mut self.engine);
        self.events.extend(events);
        self.frames += 1;
    }

    fn advance_clock(&mut self, dt: Duration) {
        self.elapsed += dt;
        for timer in self.engine.advance(dt) {
            let events = self.game.on_timer(timer, &mut self.engine);
            self.events.extend(events);
        }
    }

    fn session_bodies(
        &self,
        f: impl FnOnce(&starcatch::session::GameSession) -> Option<BodyHandle>,
    ) -> Option<BodyHandle> {
        self.game.session().and_then(f)
    }

    fn player(&self) -> Result<BodyHandle, ScenarioError> {
        self.session_bodies(|s| Some(s.world.player.body))
            .ok_or_else(|| ScenarioError::MissingEntity("player".into()))
    }

    fn hazard(&self, index: usize) -> Result<BodyHandle, ScenarioError> {
        self.session_bodies(|s| s.world.hazards.get(index).map(|h| h.body))
            .ok_or_else(|| ScenarioError::MissingEntity(format!("bomb {index}")))
    }

    fn contact(&mut self, other: BodyHandle) -> Result<(), ScenarioError> {
        let player = self.player()?;
        let events = self
            .game
            .on_contact(Contact::new(player, other), &mut self.engine);
        self.events.extend(events);
        Ok(())
    }

    pub fn outcome(&self) -> Outcome {
        let session = self.game.session();
        Outcome {
            score: self.game.score(),
            frozen: self.game.is_frozen(),
            generation: session.map_or(0, |s| s.generation),
            hazards: session.map_or(0, |s| s.world.hazards.len()),
            active_pickups: session.map_or(0, |s| s.world.active_pickups()),
            frames: self.frames,
            elapsed_ms: u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            state_bytes: self.game.serialize_state().len(),
            events: self.events.clone(),
        }
    }
}
