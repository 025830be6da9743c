use glam::Vec2;
use serde::{Deserialize, Serialize};

use starcatch_core::engine::{AnimationKey, AnimationSpec, BodyGroup, BodyHandle, Engine};

use crate::config::PlayerConfig;
use crate::input::Command;

/// Tint applied to the player when a bomb hits.
pub const DEFEAT_TINT: u32 = 0xff0000;

/// Sprite-sheet animations for the player.
pub const ANIMATIONS: [AnimationSpec; 3] = [
    AnimationSpec {
        key: AnimationKey::LeftRun,
        first_frame: 0,
        last_frame: 3,
        frame_rate: 10,
        looping: true,
    },
    AnimationSpec {
        key: AnimationKey::Turn,
        first_frame: 4,
        last_frame: 4,
        frame_rate: 20,
        looping: false,
    },
    AnimationSpec {
        key: AnimationKey::RightRun,
        first_frame: 5,
        last_frame: 8,
        frame_rate: 10,
        looping: true,
    },
];

/// Which way the player sprite is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    #[default]
    Idle,
}

impl Facing {
    pub fn animation(self) -> AnimationKey {
        match self {
            Facing::Left => AnimationKey::LeftRun,
            Facing::Right => AnimationKey::RightRun,
            Facing::Idle => AnimationKey::Turn,
        }
    }
}

/// The player character. Exactly one per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub body: BodyHandle,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub grounded_this_frame: bool,
    pub defeated: bool,
}

impl Player {
    /// Create the player body at the configured start position.
    pub fn spawn(config: &PlayerConfig, engine: &mut dyn Engine) -> Self {
        let position = Vec2::new(config.start_x, config.start_y);
        let body = engine.create_dynamic_body(BodyGroup::Player, position);
        engine.set_scale(body, config.scale);
        engine.set_bounce(body, Vec2::splat(config.bounce));
        engine.set_collide_world_bounds(body, true);
        Self::new(body, position)
    }

    pub fn new(body: BodyHandle, position: Vec2) -> Self {
        Self {
            body,
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Idle,
            grounded_this_frame: false,
            defeated: false,
        }
    }

    /// Pull the solver's results for this frame.
    pub fn sync(&mut self, engine: &dyn Engine) {
        if let Some(p) = engine.position(self.body) {
            self.position = p;
        }
        if let Some(v) = engine.velocity(self.body) {
            self.velocity = v;
        }
        self.grounded_this_frame = engine.is_touching_down(self.body);
    }

    /// Apply one command to the local state. Returns true if velocity changed
    /// on the vertical axis (a jump was taken).
    ///
    /// Jump while airborne is ignored.
    pub fn apply(&mut self, command: Command, config: &PlayerConfig) -> bool {
        match command {
            Command::MoveLeft => {
                self.velocity.x = -config.run_speed;
                self.facing = Facing::Left;
            },
            Command::MoveRight => {
                self.velocity.x = config.run_speed;
                self.facing = Facing::Right;
            },
            Command::Stop => {
                self.velocity.x = 0.0;
                self.facing = Facing::Idle;
            },
            Command::Jump => {
                if self.grounded_this_frame {
                    self.velocity.y = -config.jump_impulse;
                    return true;
                }
            },
        }
        false
    }

    /// Apply this tick's commands and push the result to the engine.
    pub fn drive(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
        config: &PlayerConfig,
        engine: &mut dyn Engine,
    ) {
        let mut jumped = false;
        for command in commands {
            jumped |= self.apply(command, config);
        }
        engine.set_velocity_x(self.body, self.velocity.x);
        if jumped {
            engine.set_velocity_y(self.body, self.velocity.y);
        }
        engine.play_animation(self.body, self.facing.animation());
    }

    /// Show the hit: red tint and the idle pose.
    pub fn defeat(&mut self, engine: &mut dyn Engine) {
        self.defeated = true;
        self.facing = Facing::Idle;
        engine.set_tint(self.body, DEFEAT_TINT);
        engine.play_animation(self.body, AnimationKey::Turn);
    }
}
