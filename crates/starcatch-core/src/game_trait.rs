use serde::{Deserialize, Serialize};

use crate::engine::{Engine, TimerId, Viewport};
use crate::events::{Contact, GameEvent};
use crate::input::{InputCapabilities, InputEvent};

/// Core trait for a single-player arcade game driven by an external host.
///
/// The host owns the tick loop, the physics step, rendering, audio, and the
/// timer clock; the game only holds rules and state. Every method runs to
/// completion and is called from one thread.
pub trait ArcadeGame {
    /// Display metadata for the host's title screen.
    fn metadata(&self) -> GameMetadata;

    /// Build the first scene. Called once before any other event.
    fn init(&mut self, viewport: Viewport, caps: InputCapabilities, engine: &mut dyn Engine);

    /// Feed one raw input event. Takes effect on the next `update`.
    fn handle_input(&mut self, event: &InputEvent);

    /// Called once per rendered frame, after the physics step.
    fn update(&mut self, dt: f32, engine: &mut dyn Engine) -> Vec<GameEvent>;

    /// A contact from a rule declared with `notify: true`.
    fn on_contact(&mut self, contact: Contact, engine: &mut dyn Engine) -> Vec<GameEvent>;

    /// A timer armed through the engine's scheduler fired.
    fn on_timer(&mut self, timer: TimerId, engine: &mut dyn Engine) -> Vec<GameEvent>;

    /// The host viewport changed size.
    fn resize(&mut self, viewport: Viewport);

    /// Encoded snapshot of the current session, for HUD and debug tooling.
    fn serialize_state(&self) -> Vec<u8>;

    /// Whether the game is in its game-over freeze.
    fn is_frozen(&self) -> bool;

    fn score(&self) -> u32;
}

/// Game metadata shown by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}
