use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use starcatch_core::engine::{
    BodyGroup, BodyHandle, ContactMode, ContactRule, Engine, Rect, Viewport,
};
use starcatch_core::events::Contact;

use crate::collision::CollisionEvent;
use crate::config::{HazardConfig, PickupConfig, StarCatchConfig};
use crate::player::{ANIMATIONS, Player};

/// Size of the unscaled platform sprite.
pub const PLATFORM_SIZE: Vec2 = Vec2::new(400.0, 32.0);
/// Scale applied to the ground platform.
const GROUND_SCALE: f32 = 4.0;

/// Index of a star in the row. Stable for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickupId(pub usize);

/// Index of a bomb in spawn order. Stable for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HazardId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub body: BodyHandle,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: PickupId,
    pub body: BodyHandle,
    pub position: Vec2,
    pub bounce_y: f32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: HazardId,
    pub body: BodyHandle,
    pub position: Vec2,
    pub velocity: Vec2,
    pub bounce: f32,
}

/// Every body in one scene instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub viewport: Viewport,
    pub platforms: Vec<Platform>,
    pub player: Player,
    pub pickups: Vec<Pickup>,
    pub hazards: Vec<Hazard>,
}

/// Platform rectangles for an arena: the ground across the bottom, then five
/// ledges at fixed offsets from the arena edges.
pub fn platform_layout(viewport: Viewport) -> Vec<Rect> {
    let (w, h) = (viewport.width, viewport.height);
    vec![
        Rect::from_center(Vec2::new(w / 2.0, h - 32.0), PLATFORM_SIZE * GROUND_SCALE),
        Rect::from_center(Vec2::new(w - 200.0, h / 1.5), PLATFORM_SIZE),
        Rect::from_center(Vec2::new(w - 1170.0, h / 1.5), PLATFORM_SIZE),
        Rect::from_center(Vec2::new(680.0, h / 2.1), PLATFORM_SIZE),
        Rect::from_center(Vec2::new(w - 50.0, h / 2.75), PLATFORM_SIZE),
        Rect::from_center(Vec2::new(w - 1320.0, h / 2.75), PLATFORM_SIZE),
    ]
}

/// Contacts the scene needs from the physics host.
pub const CONTACT_RULES: [ContactRule; 5] = [
    ContactRule {
        a: BodyGroup::Player,
        b: BodyGroup::Platforms,
        mode: ContactMode::Collide,
        notify: false,
    },
    ContactRule {
        a: BodyGroup::Pickups,
        b: BodyGroup::Platforms,
        mode: ContactMode::Collide,
        notify: false,
    },
    ContactRule {
        a: BodyGroup::Player,
        b: BodyGroup::Pickups,
        mode: ContactMode::Overlap,
        notify: true,
    },
    ContactRule {
        a: BodyGroup::Hazards,
        b: BodyGroup::Platforms,
        mode: ContactMode::Collide,
        notify: true,
    },
    ContactRule {
        a: BodyGroup::Player,
        b: BodyGroup::Hazards,
        mode: ContactMode::Collide,
        notify: true,
    },
];

/// Build a scene from scratch: platforms, player, the star row, and the
/// contact rules. The caller must have torn down any previous scene.
pub fn initialize_world(
    viewport: Viewport,
    config: &StarCatchConfig,
    engine: &mut dyn Engine,
    rng: &mut impl Rng,
) -> World {
    engine.set_gravity(Vec2::new(0.0, config.gravity_y));
    engine.set_world_bounds(viewport);
    for spec in ANIMATIONS {
        engine.define_animation(spec);
    }

    let platforms = platform_layout(viewport)
        .into_iter()
        .map(|rect| Platform {
            body: engine.create_static_body(BodyGroup::Platforms, rect),
            rect,
        })
        .collect();

    let player = Player::spawn(&config.player, engine);
    let pickups = spawn_pickup_row(&config.pickups, engine, rng);

    for rule in CONTACT_RULES {
        engine.add_contact_rule(rule);
    }

    World {
        viewport,
        platforms,
        player,
        pickups,
        hazards: Vec::new(),
    }
}

fn spawn_pickup_row(config: &PickupConfig, engine: &mut dyn Engine, rng: &mut impl Rng) -> Vec<Pickup> {
    (0..config.count)
        .map(|i| {
            let position = Vec2::new(config.first_x + i as f32 * config.step_x, config.top_y);
            let body = engine.create_dynamic_body(BodyGroup::Pickups, position);
            let bounce_y = rng.random_range(config.bounce_min..=config.bounce_max);
            engine.set_bounce(body, Vec2::new(0.0, bounce_y));
            Pickup {
                id: PickupId(i),
                body,
                position,
                bounce_y,
                active: true,
            }
        })
        .collect()
}

/// Horizontal range for a new bomb: the half of the arena away from the player.
pub fn hazard_spawn_range(viewport: Viewport, player_x: f32) -> (f32, f32) {
    let mid = viewport.midpoint_x();
    if player_x < mid {
        (mid, viewport.width)
    } else {
        (0.0, mid)
    }
}

impl World {
    pub fn active_pickups(&self) -> usize {
        self.pickups.iter().filter(|p| p.active).count()
    }

    /// Deactivate one star. Returns false if it was already collected.
    pub fn collect_pickup(&mut self, id: PickupId, engine: &mut dyn Engine) -> bool {
        let Some(pickup) = self.pickups.get_mut(id.0) else {
            return false;
        };
        if !pickup.active {
            return false;
        }
        pickup.active = false;
        engine.disable_body(pickup.body);
        true
    }

    /// Reactivate every star at its current x, back on the top row.
    pub fn replenish_pickups(&mut self, config: &PickupConfig, engine: &mut dyn Engine) -> usize {
        for pickup in &mut self.pickups {
            pickup.position = Vec2::new(pickup.position.x, config.top_y);
            pickup.active = true;
            engine.enable_body(pickup.body, pickup.position);
        }
        self.pickups.len()
    }

    /// Add a batch of bombs on the far side of the arena from the player.
    pub fn spawn_hazard_batch(
        &mut self,
        config: &HazardConfig,
        engine: &mut dyn Engine,
        rng: &mut impl Rng,
    ) -> usize {
        let (lo, hi) = hazard_spawn_range(self.viewport, self.player.position.x);
        for _ in 0..config.batch_size {
            let position = Vec2::new(rng.random_range(lo..=hi), config.spawn_y);
            let vx = rng.random_range(-config.max_speed_x..=config.max_speed_x) as f32;
            let velocity = Vec2::new(vx, config.fall_speed);

            let body = engine.create_dynamic_body(BodyGroup::Hazards, position);
            engine.set_bounce(body, Vec2::splat(config.bounce));
            engine.set_collide_world_bounds(body, true);
            engine.set_velocity(body, velocity);

            self.hazards.push(Hazard {
                id: HazardId(self.hazards.len()),
                body,
                position,
                velocity,
                bounce: config.bounce,
            });
        }
        config.batch_size
    }

    /// Pull positions for every dynamic body from the solver.
    pub fn sync(&mut self, engine: &dyn Engine) {
        self.player.sync(engine);
        for pickup in self.pickups.iter_mut().filter(|p| p.active) {
            if let Some(p) = engine.position(pickup.body) {
                pickup.position = p;
            }
        }
        for hazard in &mut self.hazards {
            if let Some(p) = engine.position(hazard.body) {
                hazard.position = p;
            }
            if let Some(v) = engine.velocity(hazard.body) {
                hazard.velocity = v;
            }
        }
    }

    fn pickup_by_body(&self, body: BodyHandle) -> Option<PickupId> {
        self.pickups.iter().find(|p| p.body == body).map(|p| p.id)
    }

    fn hazard_by_body(&self, body: BodyHandle) -> Option<HazardId> {
        self.hazards.iter().find(|h| h.body == body).map(|h| h.id)
    }

    fn is_platform(&self, body: BodyHandle) -> bool {
        self.platforms.iter().any(|p| p.body == body)
    }

    /// Resolve a raw contact to the typed event it represents, if any.
    pub fn classify(&self, contact: Contact) -> Option<CollisionEvent> {
        for (a, b) in contact.pairs() {
            if a == self.player.body {
                if let Some(id) = self.pickup_by_body(b) {
                    return Some(CollisionEvent::PickupCollected { pickup_id: id });
                }
                if let Some(id) = self.hazard_by_body(b) {
                    return Some(CollisionEvent::HazardHit { hazard_id: id });
                }
            }
            if let Some(id) = self.hazard_by_body(a)
                && self.is_platform(b)
            {
                return Some(CollisionEvent::HazardLanded { hazard_id: id });
            }
        }
        None
    }
}
