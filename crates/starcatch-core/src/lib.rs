pub mod engine;
pub mod events;
pub mod game_trait;
pub mod headless;
pub mod input;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::time::Duration;

    use glam::Vec2;

    use crate::engine::{BodyGroup, BodyHandle, Physics, Viewport};
    use crate::events::GameEvent;
    use crate::game_trait::ArcadeGame;
    use crate::headless::HeadlessEngine;
    use crate::input::{Direction, InputCapabilities, InputEvent};

    /// The arena size the platform layout is tuned for.
    pub fn default_viewport() -> Viewport {
        Viewport::new(1600.0, 900.0)
    }

    /// Initialise `game` against a fresh headless engine.
    pub fn init_headless(game: &mut dyn ArcadeGame, touch: bool) -> HeadlessEngine {
        let mut engine = HeadlessEngine::new();
        game.init(default_viewport(), InputCapabilities { touch }, &mut engine);
        engine
    }

    /// Run N game ticks, advancing the engine clock by `dt` each time and
    /// delivering fired timers before the tick. Returns all emitted events.
    pub fn run_ticks(
        game: &mut dyn ArcadeGame,
        engine: &mut HeadlessEngine,
        n: usize,
        dt: f32,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            for timer in engine.advance(Duration::from_secs_f32(dt)) {
                all_events.extend(game.on_timer(timer, engine));
            }
            all_events.extend(game.update(dt, engine));
        }
        all_events
    }

    /// Advance the clock without ticking, delivering fired timers.
    pub fn advance_clock(
        game: &mut dyn ArcadeGame,
        engine: &mut HeadlessEngine,
        dt: Duration,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for timer in engine.advance(dt) {
            events.extend(game.on_timer(timer, engine));
        }
        events
    }

    /// The single live body in `group`, panicking if there is not exactly one.
    pub fn only_body(engine: &HeadlessEngine, group: BodyGroup) -> BodyHandle {
        let bodies: Vec<BodyHandle> = engine.bodies_in_group(group).map(|(h, _)| h).collect();
        assert_eq!(bodies.len(), 1, "Expected exactly one {group:?} body");
        bodies[0]
    }

    /// Place the player on the ground at `x`.
    pub fn ground_player(engine: &mut HeadlessEngine, x: f32) -> BodyHandle {
        let player = only_body(engine, BodyGroup::Player);
        engine.set_position(player, Vec2::new(x, 400.0));
        engine.set_touching_down(player, true);
        player
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every ArcadeGame implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules.

    /// After init(), exactly one player body exists and state encodes.
    pub fn contract_init_creates_single_player(game: &mut dyn ArcadeGame) {
        let engine = init_headless(game, false);
        assert_eq!(
            engine.bodies_in_group(BodyGroup::Player).count(),
            1,
            "init() must create exactly one player body"
        );
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
        assert!(!game.is_frozen(), "A new game must start Playing");
        assert_eq!(game.score(), 0);
    }

    /// While frozen, held input must not reach the player's velocity.
    ///
    /// `freeze` drives the game from a fresh scene into its game-over state.
    pub fn contract_frozen_ignores_input(
        game: &mut dyn ArcadeGame,
        freeze: &dyn Fn(&mut dyn ArcadeGame, &mut HeadlessEngine),
    ) {
        let mut engine = init_headless(game, false);
        let player = ground_player(&mut engine, 200.0);
        freeze(&mut *game, &mut engine);
        assert!(game.is_frozen(), "freeze must leave the game frozen");

        let before = engine.velocity(player);
        game.handle_input(&InputEvent::KeyDown(Direction::Right));
        game.handle_input(&InputEvent::KeyDown(Direction::Up));
        game.update(1.0 / 60.0, &mut engine);
        assert_eq!(
            engine.velocity(player),
            before,
            "Input must not change velocity while frozen"
        );
    }

    /// Held right input must produce positive horizontal velocity.
    pub fn contract_input_moves_player(game: &mut dyn ArcadeGame) {
        let mut engine = init_headless(game, false);
        let player = ground_player(&mut engine, 200.0);
        game.handle_input(&InputEvent::KeyDown(Direction::Right));
        game.update(1.0 / 60.0, &mut engine);
        assert!(
            engine.velocity(player).is_some_and(|v| v.x > 0.0),
            "Holding right must move the player right"
        );
    }
}
