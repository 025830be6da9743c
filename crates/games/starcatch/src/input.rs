//! Input controller: raw key and pointer events in, one horizontal command
//! plus an optional jump out, once per tick.
//!
//! Every source (keyboard, screen-half taps, on-screen buttons) is an
//! [`InputAdapter`] that tracks which [`Action`]s it is holding. The
//! controller merges them, so a key and a finger on the same side never
//! fight over the player's velocity.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use starcatch_core::engine::{Rect, Viewport};
use starcatch_core::input::{Direction, InputCapabilities, InputEvent, PointerId};

use crate::config::{InputConfig, TouchMode};

/// The velocity-command vocabulary consumed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Stop,
    Jump,
}

/// What an input source can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
}

/// Commands resolved for one tick: always a horizontal command, and a jump
/// only when one was requested while grounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCommands {
    pub horizontal: Command,
    pub jump: bool,
}

impl IntoIterator for TickCommands {
    type Item = Command;
    type IntoIter = std::iter::Chain<std::iter::Once<Command>, std::option::IntoIter<Command>>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self.horizontal).chain(self.jump.then_some(Command::Jump))
    }
}

/// One source of player input.
pub trait InputAdapter: std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn handle(&mut self, event: &InputEvent, viewport: Viewport);

    fn is_held(&self, action: Action) -> bool;

    /// One-shot jump request. Cleared by the call.
    fn take_jump_request(&mut self) -> bool {
        false
    }

    /// Drop one-shot requests. Held state survives, since the physical
    /// key or finger is still down.
    fn clear_requests(&mut self) {}
}

/// The four arrow keys. Up is jump; down is ignored.
#[derive(Debug, Default)]
pub struct KeyboardAdapter {
    keys_down: HashSet<Direction>,
}

impl InputAdapter for KeyboardAdapter {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn handle(&mut self, event: &InputEvent, _viewport: Viewport) {
        match *event {
            InputEvent::KeyDown(dir) => {
                self.keys_down.insert(dir);
            },
            InputEvent::KeyUp(dir) => {
                self.keys_down.remove(&dir);
            },
            _ => {},
        }
    }

    fn is_held(&self, action: Action) -> bool {
        let dir = match action {
            Action::Left => Direction::Left,
            Action::Right => Direction::Right,
            Action::Jump => Direction::Up,
        };
        self.keys_down.contains(&dir)
    }
}

/// A press anywhere on the left half runs left, the right half runs right.
#[derive(Debug, Default)]
pub struct ScreenHalfAdapter {
    pointers: HashMap<PointerId, Action>,
}

impl InputAdapter for ScreenHalfAdapter {
    fn name(&self) -> &'static str {
        "screen-halves"
    }

    fn handle(&mut self, event: &InputEvent, viewport: Viewport) {
        match *event {
            InputEvent::PointerDown { id, position } => {
                let action = if position.x < viewport.midpoint_x() {
                    Action::Left
                } else {
                    Action::Right
                };
                self.pointers.insert(id, action);
            },
            InputEvent::PointerUp { id, .. } => {
                self.pointers.remove(&id);
            },
            _ => {},
        }
    }

    fn is_held(&self, action: Action) -> bool {
        self.pointers.values().any(|&a| a == action)
    }
}

/// A square on-screen button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchButton {
    pub action: Action,
    pub rect: Rect,
}

/// Left and right buttons in the bottom-left corner, jump in the bottom-right.
pub fn button_layout(viewport: Viewport, config: &InputConfig) -> Vec<TouchButton> {
    let size = config.button_size;
    let margin = config.button_margin;
    let y = viewport.height - margin - size / 2.0;
    let square = Vec2::splat(size);
    vec![
        TouchButton {
            action: Action::Left,
            rect: Rect::from_center(Vec2::new(margin + size / 2.0, y), square),
        },
        TouchButton {
            action: Action::Right,
            rect: Rect::from_center(Vec2::new(2.0 * margin + 1.5 * size, y), square),
        },
        TouchButton {
            action: Action::Jump,
            rect: Rect::from_center(Vec2::new(viewport.width - margin - size / 2.0, y), square),
        },
    ]
}

/// On-screen buttons. Left/right hold while pressed; jump is a one-shot
/// request raised on press and never re-checked on release.
#[derive(Debug)]
pub struct TouchButtonAdapter {
    config: InputConfig,
    pressed: HashMap<PointerId, Action>,
    jump_requested: bool,
}

impl TouchButtonAdapter {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            pressed: HashMap::new(),
            jump_requested: false,
        }
    }
}

impl InputAdapter for TouchButtonAdapter {
    fn name(&self) -> &'static str {
        "touch-buttons"
    }

    fn handle(&mut self, event: &InputEvent, viewport: Viewport) {
        match *event {
            InputEvent::PointerDown { id, position } => {
                let hit = button_layout(viewport, &self.config)
                    .into_iter()
                    .find(|b| b.rect.contains(position));
                match hit.map(|b| b.action) {
                    Some(Action::Jump) => self.jump_requested = true,
                    Some(action) => {
                        self.pressed.insert(id, action);
                    },
                    None => {},
                }
            },
            InputEvent::PointerUp { id, .. } => {
                self.pressed.remove(&id);
            },
            _ => {},
        }
    }

    fn is_held(&self, action: Action) -> bool {
        self.pressed.values().any(|&a| a == action)
    }

    fn take_jump_request(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }

    fn clear_requests(&mut self) {
        self.jump_requested = false;
    }
}

/// Merges every installed adapter into per-tick commands.
#[derive(Debug)]
pub struct InputController {
    adapters: Vec<Box<dyn InputAdapter>>,
    viewport: Viewport,
}

impl InputController {
    /// Keyboard always; a touch adapter only on touch-capable devices.
    pub fn new(caps: InputCapabilities, config: &InputConfig, viewport: Viewport) -> Self {
        let mut adapters: Vec<Box<dyn InputAdapter>> = vec![Box::new(KeyboardAdapter::default())];
        if caps.touch {
            match config.touch_mode {
                TouchMode::ScreenHalves => adapters.push(Box::new(ScreenHalfAdapter::default())),
                TouchMode::Buttons => {
                    adapters.push(Box::new(TouchButtonAdapter::new(config.clone())))
                },
            }
        }
        tracing::debug!(
            adapters = ?adapters.iter().map(|a| a.name()).collect::<Vec<_>>(),
            "Input controller ready"
        );
        Self { adapters, viewport }
    }

    pub fn with_adapters(adapters: Vec<Box<dyn InputAdapter>>, viewport: Viewport) -> Self {
        Self { adapters, viewport }
    }

    pub fn adapter_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn handle(&mut self, event: &InputEvent) {
        for adapter in &mut self.adapters {
            adapter.handle(event, self.viewport);
        }
    }

    fn held(&self, action: Action) -> bool {
        self.adapters.iter().any(|a| a.is_held(action))
    }

    /// Resolve this tick's commands. Left wins over right. Jump is
    /// level-triggered for held sources and only emitted while grounded;
    /// one-shot requests are consumed either way.
    pub fn resolve(&mut self, grounded: bool) -> TickCommands {
        let horizontal = if self.held(Action::Left) {
            Command::MoveLeft
        } else if self.held(Action::Right) {
            Command::MoveRight
        } else {
            Command::Stop
        };
        let mut requested = false;
        for adapter in &mut self.adapters {
            requested |= adapter.take_jump_request();
        }
        let jump = grounded && (requested || self.held(Action::Jump));
        TickCommands { horizontal, jump }
    }

    pub fn clear_requests(&mut self) {
        for adapter in &mut self.adapters {
            adapter.clear_requests();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1600.0, 900.0)
    }

    fn keyboard() -> InputController {
        InputController::new(InputCapabilities::default(), &InputConfig::default(), viewport())
    }

    fn touch(mode: TouchMode) -> InputController {
        let config = InputConfig {
            touch_mode: mode,
            ..InputConfig::default()
        };
        InputController::new(InputCapabilities { touch: true }, &config, viewport())
    }

    fn down(id: PointerId, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            id,
            position: Vec2::new(x, y),
        }
    }

    fn up(id: PointerId) -> InputEvent {
        InputEvent::PointerUp {
            id,
            position: Vec2::ZERO,
        }
    }

    #[test]
    fn no_input_stops() {
        let mut c = keyboard();
        let cmds = c.resolve(true);
        assert_eq!(cmds.horizontal, Command::Stop);
        assert!(!cmds.jump);
        assert_eq!(cmds.into_iter().collect::<Vec<_>>(), vec![Command::Stop]);
    }

    #[test]
    fn left_takes_priority_over_right() {
        let mut c = keyboard();
        c.handle(&InputEvent::KeyDown(Direction::Right));
        c.handle(&InputEvent::KeyDown(Direction::Left));
        assert_eq!(c.resolve(true).horizontal, Command::MoveLeft);
        c.handle(&InputEvent::KeyUp(Direction::Left));
        assert_eq!(c.resolve(true).horizontal, Command::MoveRight);
    }

    #[test]
    fn held_jump_is_level_triggered() {
        let mut c = keyboard();
        c.handle(&InputEvent::KeyDown(Direction::Up));
        assert!(!c.resolve(false).jump, "Airborne jump must be dropped");
        assert!(c.resolve(true).jump, "Still-held jump fires on landing");
        assert!(c.resolve(true).jump, "Held jump stays active");
        c.handle(&InputEvent::KeyUp(Direction::Up));
        assert!(!c.resolve(true).jump);
    }

    #[test]
    fn jump_and_move_in_same_tick() {
        let mut c = keyboard();
        c.handle(&InputEvent::KeyDown(Direction::Right));
        c.handle(&InputEvent::KeyDown(Direction::Up));
        let cmds: Vec<Command> = c.resolve(true).into_iter().collect();
        assert_eq!(cmds, vec![Command::MoveRight, Command::Jump]);
    }

    #[test]
    fn down_key_is_ignored() {
        let mut c = keyboard();
        c.handle(&InputEvent::KeyDown(Direction::Down));
        assert_eq!(c.resolve(true).horizontal, Command::Stop);
    }

    #[test]
    fn keyboard_only_without_touch() {
        assert_eq!(keyboard().adapter_names(), vec!["keyboard"]);
        let mut c = keyboard();
        c.handle(&down(1, 10.0, 10.0));
        assert_eq!(
            c.resolve(true).horizontal,
            Command::Stop,
            "Pointers are ignored on non-touch devices"
        );
    }

    #[test]
    fn screen_halves_map_to_direction() {
        let mut c = touch(TouchMode::ScreenHalves);
        assert_eq!(c.adapter_names(), vec!["keyboard", "screen-halves"]);
        c.handle(&down(1, 200.0, 500.0));
        assert_eq!(c.resolve(true).horizontal, Command::MoveLeft);
        c.handle(&up(1));
        assert_eq!(c.resolve(true).horizontal, Command::Stop);
        c.handle(&down(2, 1200.0, 500.0));
        assert_eq!(c.resolve(true).horizontal, Command::MoveRight);
    }

    #[test]
    fn screen_half_release_keeps_other_pointer() {
        let mut c = touch(TouchMode::ScreenHalves);
        c.handle(&down(1, 1200.0, 500.0));
        c.handle(&down(2, 1300.0, 500.0));
        c.handle(&up(1));
        assert_eq!(c.resolve(true).horizontal, Command::MoveRight);
    }

    #[test]
    fn key_and_pointer_do_not_cancel() {
        let mut c = touch(TouchMode::ScreenHalves);
        c.handle(&InputEvent::KeyDown(Direction::Right));
        c.handle(&down(1, 1200.0, 500.0));
        c.handle(&up(1));
        assert_eq!(
            c.resolve(true).horizontal,
            Command::MoveRight,
            "Releasing the finger must not release the key"
        );
    }

    #[test]
    fn buttons_hold_direction() {
        let mut c = touch(TouchMode::Buttons);
        let layout = button_layout(viewport(), &InputConfig::default());
        let right = layout.iter().find(|b| b.action == Action::Right).unwrap();
        c.handle(&down(7, right.rect.center.x, right.rect.center.y));
        assert_eq!(c.resolve(true).horizontal, Command::MoveRight);
        c.handle(&up(7));
        assert_eq!(c.resolve(true).horizontal, Command::Stop);
    }

    #[test]
    fn jump_button_is_one_shot() {
        let mut c = touch(TouchMode::Buttons);
        let layout = button_layout(viewport(), &InputConfig::default());
        let jump = layout.iter().find(|b| b.action == Action::Jump).unwrap();
        c.handle(&down(3, jump.rect.center.x, jump.rect.center.y));
        assert!(c.resolve(true).jump);
        assert!(!c.resolve(true).jump, "Jump request must be consumed");
    }

    #[test]
    fn jump_button_press_while_airborne_is_dropped() {
        let mut c = touch(TouchMode::Buttons);
        let layout = button_layout(viewport(), &InputConfig::default());
        let jump = layout.iter().find(|b| b.action == Action::Jump).unwrap();
        c.handle(&down(3, jump.rect.center.x, jump.rect.center.y));
        assert!(!c.resolve(false).jump);
        assert!(
            !c.resolve(true).jump,
            "A press checked while airborne must not fire on landing"
        );
    }

    #[test]
    fn press_outside_buttons_does_nothing() {
        let mut c = touch(TouchMode::Buttons);
        c.handle(&down(1, 800.0, 100.0));
        let cmds = c.resolve(true);
        assert_eq!(cmds.horizontal, Command::Stop);
        assert!(!cmds.jump);
    }

    #[test]
    fn clear_requests_drops_pending_jump() {
        let mut c = touch(TouchMode::Buttons);
        let layout = button_layout(viewport(), &InputConfig::default());
        let jump = layout.iter().find(|b| b.action == Action::Jump).unwrap();
        c.handle(&down(3, jump.rect.center.x, jump.rect.center.y));
        c.clear_requests();
        assert!(!c.resolve(true).jump);
    }

    /// Latches the first right press and any up press; ignores releases.
    #[derive(Debug, Default)]
    struct Gamepad {
        right: bool,
        jump: bool,
    }

    impl InputAdapter for Gamepad {
        fn name(&self) -> &'static str {
            "gamepad"
        }

        fn handle(&mut self, event: &InputEvent, _viewport: Viewport) {
            match *event {
                InputEvent::KeyDown(Direction::Right) => self.right = true,
                InputEvent::KeyDown(Direction::Up) => self.jump = true,
                _ => {},
            }
        }

        fn is_held(&self, action: Action) -> bool {
            action == Action::Right && self.right
        }

        fn take_jump_request(&mut self) -> bool {
            std::mem::take(&mut self.jump)
        }
    }

    #[test]
    fn custom_adapter_merges_with_keyboard() {
        let mut c = InputController::with_adapters(
            vec![Box::new(Gamepad::default()), Box::new(KeyboardAdapter::default())],
            viewport(),
        );
        assert_eq!(c.adapter_names(), vec!["gamepad", "keyboard"]);

        for event in [
            InputEvent::KeyDown(Direction::Right),
            InputEvent::KeyDown(Direction::Up),
            InputEvent::KeyUp(Direction::Up),
            InputEvent::KeyUp(Direction::Right),
        ] {
            c.handle(&event);
        }
        let cmds: Vec<Command> = c.resolve(true).into_iter().collect();
        assert_eq!(cmds, vec![Command::MoveRight, Command::Jump]);
        assert!(!c.resolve(true).jump, "Adapter request consumed");

        c.handle(&InputEvent::KeyDown(Direction::Left));
        assert_eq!(
            c.resolve(true).horizontal,
            Command::MoveLeft,
            "Keyboard left beats an adapter holding right"
        );
    }

    #[test]
    fn button_layout_fits_viewport() {
        let vp = viewport();
        for b in button_layout(vp, &InputConfig::default()) {
            assert!(b.rect.min().x >= 0.0 && b.rect.max().x <= vp.width, "{b:?}");
            assert!(b.rect.min().y >= 0.0 && b.rect.max().y <= vp.height, "{b:?}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_jumps_while_airborne(
                keys in proptest::collection::vec((0u8..4, any::<bool>()), 0..30),
                taps in proptest::collection::vec((0.0f32..1600.0, 0.0f32..900.0), 0..5)
            ) {
                let mut ctl = touch(TouchMode::Buttons);
                for (k, pressed) in keys {
                    let dir = [Direction::Left, Direction::Right, Direction::Up, Direction::Down][k as usize];
                    ctl.handle(&if pressed { InputEvent::KeyDown(dir) } else { InputEvent::KeyUp(dir) });
                }
                for (i, (x, y)) in taps.into_iter().enumerate() {
                    ctl.handle(&down(i as PointerId, x, y));
                }
                prop_assert!(!ctl.resolve(false).jump);
            }

            #[test]
            fn left_always_wins(right_first in any::<bool>()) {
                let mut ctl = keyboard();
                let order = if right_first {
                    [Direction::Right, Direction::Left]
                } else {
                    [Direction::Left, Direction::Right]
                };
                for dir in order {
                    ctl.handle(&InputEvent::KeyDown(dir));
                }
                prop_assert_eq!(ctl.resolve(true).horizontal, Command::MoveLeft);
            }
        }
    }
}
