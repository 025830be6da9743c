//! A collaborator with no solver and no renderer.
//!
//! `HeadlessEngine` keeps a table of bodies and remembers every command the
//! game issues, but never moves anything on its own: positions and ground
//! contact change only when the driver sets them. The replay runner and the
//! test suites use it to stand in for the real physics/render host.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use glam::Vec2;

use crate::engine::{
    AnimationKey, AnimationSpec, BodyGroup, BodyHandle, ContactRule, HudText, Physics,
    Presentation, Rect, Scheduler, SoundId, TimerId, Viewport,
};
use crate::timer::TimerQueue;

/// Everything the headless host knows about one body.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessBody {
    pub group: BodyGroup,
    pub is_static: bool,
    pub rect: Option<Rect>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub bounce: Vec2,
    pub collide_world_bounds: bool,
    pub enabled: bool,
    pub touching_down: bool,
    pub scale: f32,
    pub tint: Option<u32>,
    pub animation: Option<AnimationKey>,
}

impl HeadlessBody {
    fn new(group: BodyGroup, position: Vec2) -> Self {
        Self {
            group,
            is_static: false,
            rect: None,
            position,
            velocity: Vec2::ZERO,
            bounce: Vec2::ZERO,
            collide_world_bounds: false,
            enabled: true,
            touching_down: false,
            scale: 1.0,
            tint: None,
            animation: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    bodies: BTreeMap<BodyHandle, HeadlessBody>,
    next_body: u32,
    rules: Vec<ContactRule>,
    animations: Vec<AnimationSpec>,
    gravity: Vec2,
    world_bounds: Option<Viewport>,
    paused: bool,
    timers: TimerQueue,
    hud: HashMap<HudText, String>,
    sounds: Vec<SoundId>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&HeadlessBody> {
        self.bodies.get(&handle)
    }

    pub fn bodies_in_group(&self, group: BodyGroup) -> impl Iterator<Item = (BodyHandle, &HeadlessBody)> {
        self.bodies
            .iter()
            .filter(move |(_, b)| b.group == group)
            .map(|(h, b)| (*h, b))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Move a body as the solver would.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = position;
        }
    }

    /// Set the solver's ground-contact result for a body.
    pub fn set_touching_down(&mut self, handle: BodyHandle, touching: bool) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.touching_down = touching;
        }
    }

    /// Advance the virtual clock, returning timers that fired.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        let fired = self.timers.advance(dt);
        for id in &fired {
            tracing::trace!(timer = id.0, "Timer fired");
        }
        fired
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn world_bounds(&self) -> Option<Viewport> {
        self.world_bounds
    }

    pub fn contact_rules(&self) -> &[ContactRule] {
        &self.rules
    }

    pub fn animations(&self) -> &[AnimationSpec] {
        &self.animations
    }

    pub fn hud_text(&self, hud: HudText) -> Option<&str> {
        self.hud.get(&hud).map(String::as_str)
    }

    /// Every sound played so far, oldest first.
    pub fn sounds(&self) -> &[SoundId] {
        &self.sounds
    }

    pub fn sound_count(&self, sound: SoundId) -> usize {
        self.sounds.iter().filter(|&&s| s == sound).count()
    }

    fn with_body(&mut self, handle: BodyHandle, f: impl FnOnce(&mut HeadlessBody)) {
        match self.bodies.get_mut(&handle) {
            Some(body) => f(body),
            None => tracing::debug!(body = handle.0, "Command for unknown body ignored"),
        }
    }

    fn insert(&mut self, body: HeadlessBody) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.bodies.insert(handle, body);
        handle
    }
}

impl Physics for HeadlessEngine {
    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn set_world_bounds(&mut self, viewport: Viewport) {
        self.world_bounds = Some(viewport);
    }

    fn add_contact_rule(&mut self, rule: ContactRule) {
        self.rules.push(rule);
    }

    fn create_static_body(&mut self, group: BodyGroup, rect: Rect) -> BodyHandle {
        let mut body = HeadlessBody::new(group, rect.center);
        body.is_static = true;
        body.rect = Some(rect);
        self.insert(body)
    }

    fn create_dynamic_body(&mut self, group: BodyGroup, position: Vec2) -> BodyHandle {
        self.insert(HeadlessBody::new(group, position))
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        self.with_body(body, |b| b.velocity = velocity);
    }

    fn set_velocity_x(&mut self, body: BodyHandle, vx: f32) {
        self.with_body(body, |b| b.velocity.x = vx);
    }

    fn set_velocity_y(&mut self, body: BodyHandle, vy: f32) {
        self.with_body(body, |b| b.velocity.y = vy);
    }

    fn set_bounce(&mut self, body: BodyHandle, bounce: Vec2) {
        self.with_body(body, |b| b.bounce = bounce);
    }

    fn set_collide_world_bounds(&mut self, body: BodyHandle, collide: bool) {
        self.with_body(body, |b| b.collide_world_bounds = collide);
    }

    fn disable_body(&mut self, body: BodyHandle) {
        self.with_body(body, |b| {
            b.enabled = false;
            b.velocity = Vec2::ZERO;
        });
    }

    fn enable_body(&mut self, body: BodyHandle, position: Vec2) {
        self.with_body(body, |b| {
            b.enabled = true;
            b.position = position;
            b.velocity = Vec2::ZERO;
            b.touching_down = false;
        });
    }

    fn destroy_all(&mut self) {
        tracing::trace!(bodies = self.bodies.len(), "Destroying scene bodies");
        self.bodies.clear();
        self.rules.clear();
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn is_touching_down(&self, body: BodyHandle) -> bool {
        self.bodies.get(&body).is_some_and(|b| b.touching_down)
    }
}

impl Presentation for HeadlessEngine {
    fn define_animation(&mut self, spec: AnimationSpec) {
        self.animations.retain(|a| a.key != spec.key);
        self.animations.push(spec);
    }

    fn play_animation(&mut self, body: BodyHandle, key: AnimationKey) {
        self.with_body(body, |b| b.animation = Some(key));
    }

    fn set_scale(&mut self, body: BodyHandle, scale: f32) {
        self.with_body(body, |b| b.scale = scale);
    }

    fn set_tint(&mut self, body: BodyHandle, rgb: u32) {
        self.with_body(body, |b| b.tint = Some(rgb));
    }

    fn set_text(&mut self, hud: HudText, text: &str) {
        self.hud.insert(hud, text.to_string());
    }

    fn play_sound(&mut self, sound: SoundId) {
        tracing::trace!(?sound, "Sound");
        self.sounds.push(sound);
    }
}

impl Scheduler for HeadlessEngine {
    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        self.timers.schedule(delay)
    }
}
