use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a body owned by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Handle to a one-shot timer armed through [`Scheduler::schedule_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Collision group a body belongs to. Contact rules are declared between groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyGroup {
    Platforms,
    Player,
    Pickups,
    Hazards,
}

/// How two groups interact when their bodies touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMode {
    /// Solid collision resolved by the physics solver.
    Collide,
    /// Overlap test only; bodies pass through each other.
    Overlap,
}

/// Declares that bodies of group `a` interact with bodies of group `b`.
///
/// When `notify` is set the collaborator reports each contact back to the game
/// as a [`crate::events::Contact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRule {
    pub a: BodyGroup,
    pub b: BodyGroup,
    pub mode: ContactMode,
    pub notify: bool,
}

/// Axis-aligned rectangle described by its center and full size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Visible arena dimensions in screen units. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn midpoint_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Finite and non-empty on both axes.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Sound cues the game asks the collaborator to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    Collect,
    Bounce,
    Hit,
}

/// Named sprite animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKey {
    LeftRun,
    Turn,
    RightRun,
}

/// Frame range and playback rate for one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub key: AnimationKey,
    pub first_frame: u16,
    pub last_frame: u16,
    pub frame_rate: u16,
    pub looping: bool,
}

/// Text elements on the heads-up display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HudText {
    Score,
}

/// Physics capabilities: body creation, velocity control, and contact queries.
///
/// The solver itself (gravity integration, collision resolution) lives behind
/// this trait and is never modelled by the game.
pub trait Physics {
    fn set_gravity(&mut self, gravity: Vec2);
    fn set_world_bounds(&mut self, viewport: Viewport);
    fn add_contact_rule(&mut self, rule: ContactRule);

    fn create_static_body(&mut self, group: BodyGroup, rect: Rect) -> BodyHandle;
    fn create_dynamic_body(&mut self, group: BodyGroup, position: Vec2) -> BodyHandle;

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn set_velocity_x(&mut self, body: BodyHandle, vx: f32);
    fn set_velocity_y(&mut self, body: BodyHandle, vy: f32);
    fn set_bounce(&mut self, body: BodyHandle, bounce: Vec2);
    fn set_collide_world_bounds(&mut self, body: BodyHandle, collide: bool);

    /// Remove a body from simulation and rendering without destroying it.
    fn disable_body(&mut self, body: BodyHandle);
    /// Re-enable a disabled body, teleporting it to `position`.
    fn enable_body(&mut self, body: BodyHandle, position: Vec2);
    /// Destroy every body and contact rule. Used when a scene is rebuilt.
    fn destroy_all(&mut self);

    fn pause(&mut self);
    fn resume(&mut self);

    fn position(&self, body: BodyHandle) -> Option<Vec2>;
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    /// Whether the body is resting on something below it this step.
    fn is_touching_down(&self, body: BodyHandle) -> bool;
}

/// Rendering and audio feedback.
pub trait Presentation {
    fn define_animation(&mut self, spec: AnimationSpec);
    fn play_animation(&mut self, body: BodyHandle, key: AnimationKey);
    fn set_scale(&mut self, body: BodyHandle, scale: f32);
    fn set_tint(&mut self, body: BodyHandle, rgb: u32);
    fn set_text(&mut self, hud: HudText, text: &str);
    fn play_sound(&mut self, sound: SoundId);
}

/// One-shot timers. Firing is delivered back to the game as a [`TimerId`].
pub trait Scheduler {
    fn schedule_once(&mut self, delay: Duration) -> TimerId;
}

/// The full capability set the game consumes from its host.
pub trait Engine: Physics + Presentation + Scheduler {}

impl<T: Physics + Presentation + Scheduler> Engine for T {}
