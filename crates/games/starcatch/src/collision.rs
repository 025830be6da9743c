use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use starcatch_core::engine::{Engine, HudText, SoundId};
use starcatch_core::events::GameEvent;

use crate::config::StarCatchConfig;
use crate::session::GameSession;
use crate::world::{HazardId, PickupId};

/// Typed collision messages, resolved from raw contacts by [`crate::world::World::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    PickupCollected { pickup_id: PickupId },
    HazardHit { hazard_id: HazardId },
    HazardLanded { hazard_id: HazardId },
}

/// Apply one collision to the session. Collisions delivered while frozen are
/// dropped: the solver is paused, and anything still in flight belongs to a
/// round that is already over.
pub fn dispatch(
    session: &mut GameSession,
    event: CollisionEvent,
    config: &StarCatchConfig,
    engine: &mut dyn Engine,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    if session.is_frozen() {
        tracing::debug!(?event, "Collision ignored while frozen");
        return Vec::new();
    }
    match event {
        CollisionEvent::PickupCollected { pickup_id } => {
            on_pickup_collected(session, pickup_id, config, engine, rng)
        },
        CollisionEvent::HazardHit { hazard_id } => on_hazard_hit(session, hazard_id, config, engine),
        CollisionEvent::HazardLanded { hazard_id } => {
            if session.world.hazards.get(hazard_id.0).is_some() {
                engine.play_sound(SoundId::Bounce);
            }
            Vec::new()
        },
    }
}

fn on_pickup_collected(
    session: &mut GameSession,
    pickup_id: PickupId,
    config: &StarCatchConfig,
    engine: &mut dyn Engine,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    if !session.world.collect_pickup(pickup_id, engine) {
        tracing::debug!(pickup = pickup_id.0, "Pickup already collected");
        return Vec::new();
    }

    let score = session.score.award(config.pickups.reward);
    engine.set_text(HudText::Score, &session.score.hud_text());
    engine.play_sound(SoundId::Collect);
    let mut events = vec![GameEvent::ScoreChanged { score }];

    if session.world.active_pickups() == 0 {
        session.world.sync(engine);
        let count = session.world.replenish_pickups(&config.pickups, engine);
        let spawned = session.world.spawn_hazard_batch(&config.hazards, engine, rng);
        let total = session.world.hazards.len();
        tracing::info!(score, spawned, total, "Star row cleared, bombs released");
        events.push(GameEvent::PickupsReplenished { count });
        events.push(GameEvent::HazardsSpawned { spawned, total });
    }
    events
}

fn on_hazard_hit(
    session: &mut GameSession,
    hazard_id: HazardId,
    config: &StarCatchConfig,
    engine: &mut dyn Engine,
) -> Vec<GameEvent> {
    let delay = Duration::from_millis(config.restart_delay_ms);
    match session.freeze(delay, engine) {
        Some(cmd) => {
            let score = session.score.value();
            tracing::info!(
                score,
                hazard = hazard_id.0,
                restart_in_ms = config.restart_delay_ms,
                timer = cmd.timer.0,
                "Player hit, game over"
            );
            vec![GameEvent::GameOver { score }]
        },
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use starcatch_core::engine::{BodyGroup, Viewport};
    use starcatch_core::headless::HeadlessEngine;

    use crate::session::GameState;

    fn setup(config: &StarCatchConfig) -> (GameSession, HeadlessEngine, StdRng) {
        let mut engine = HeadlessEngine::new();
        let mut rng = StdRng::seed_from_u64(3);
        let session = GameSession::start(
            0,
            Viewport::new(1600.0, 900.0),
            config,
            &mut engine,
            &mut rng,
        );
        (session, engine, rng)
    }

    fn collect(
        session: &mut GameSession,
        id: usize,
        config: &StarCatchConfig,
        engine: &mut HeadlessEngine,
        rng: &mut StdRng,
    ) -> Vec<GameEvent> {
        dispatch(
            session,
            CollisionEvent::PickupCollected {
                pickup_id: PickupId(id),
            },
            config,
            engine,
            rng,
        )
    }

    #[test]
    fn collecting_awards_ten() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        let events = collect(&mut session, 0, &config, &mut engine, &mut rng);
        assert_eq!(events, vec![GameEvent::ScoreChanged { score: 10 }]);
        assert_eq!(session.score.value(), 10);
        assert_eq!(engine.hud_text(HudText::Score), Some("Score: 10"));
        assert_eq!(engine.sound_count(SoundId::Collect), 1);
        assert!(!session.world.pickups[0].active);
    }

    #[test]
    fn inactive_pickup_is_not_double_scored() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        collect(&mut session, 4, &config, &mut engine, &mut rng);
        let events = collect(&mut session, 4, &config, &mut engine, &mut rng);
        assert!(events.is_empty());
        assert_eq!(session.score.value(), 10);
        assert_eq!(engine.sound_count(SoundId::Collect), 1);
    }

    #[test]
    fn unknown_pickup_ignored() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        assert!(collect(&mut session, 500, &config, &mut engine, &mut rng).is_empty());
        assert_eq!(session.score.value(), 0);
    }

    #[test]
    fn clearing_row_replenishes_and_spawns_atomically() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        for i in 0..18 {
            collect(&mut session, i, &config, &mut engine, &mut rng);
            assert!(session.world.hazards.is_empty());
        }
        assert_eq!(session.world.active_pickups(), 1);

        let events = collect(&mut session, 18, &config, &mut engine, &mut rng);
        assert_eq!(session.score.value(), 190);
        assert_eq!(session.world.active_pickups(), 19);
        assert_eq!(session.world.hazards.len(), 3);
        assert_eq!(engine.bodies_in_group(BodyGroup::Hazards).count(), 3);
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged { score: 190 },
                GameEvent::PickupsReplenished { count: 19 },
                GameEvent::HazardsSpawned {
                    spawned: 3,
                    total: 3
                },
            ]
        );
        assert!(session.world.pickups.iter().all(|p| p.position.y == 0.0));
    }

    #[test]
    fn touch_variant_spawns_one_per_clear() {
        let config = StarCatchConfig::touch();
        let (mut session, mut engine, mut rng) = setup(&config);
        for round in 1..=2 {
            for i in 0..19 {
                collect(&mut session, i, &config, &mut engine, &mut rng);
            }
            assert_eq!(session.world.hazards.len(), round, "Hazards accumulate");
        }
        assert_eq!(session.score.value(), 380);
    }

    #[test]
    fn spawn_side_uses_current_player_position() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        engine.set_position(session.world.player.body, Vec2::new(1400.0, 800.0));
        for i in 0..19 {
            collect(&mut session, i, &config, &mut engine, &mut rng);
        }
        assert!(
            session.world.hazards.iter().all(|h| h.position.x <= 800.0),
            "Player on the right half, bombs must spawn on the left"
        );
    }

    #[test]
    fn hazard_hit_freezes() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        session.score.award(30);
        let events = dispatch(
            &mut session,
            CollisionEvent::HazardHit {
                hazard_id: HazardId(0),
            },
            &config,
            &mut engine,
            &mut rng,
        );
        assert_eq!(events, vec![GameEvent::GameOver { score: 30 }]);
        assert_eq!(session.state, GameState::Frozen);
        assert!(engine.is_paused());
        assert_eq!(engine.pending_timers(), 1);
    }

    #[test]
    fn collisions_while_frozen_are_ignored() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        let hit = CollisionEvent::HazardHit {
            hazard_id: HazardId(0),
        };
        dispatch(&mut session, hit, &config, &mut engine, &mut rng);

        assert!(dispatch(&mut session, hit, &config, &mut engine, &mut rng).is_empty());
        assert!(collect(&mut session, 0, &config, &mut engine, &mut rng).is_empty());
        assert_eq!(session.score.value(), 0);
        assert_eq!(engine.pending_timers(), 1, "Restart armed once");
        assert_eq!(engine.sound_count(SoundId::Hit), 1);
    }

    #[test]
    fn hazard_landing_plays_bounce() {
        let config = StarCatchConfig::default();
        let (mut session, mut engine, mut rng) = setup(&config);
        for i in 0..19 {
            collect(&mut session, i, &config, &mut engine, &mut rng);
        }
        let landed = CollisionEvent::HazardLanded {
            hazard_id: HazardId(2),
        };
        let events = dispatch(&mut session, landed, &config, &mut engine, &mut rng);
        assert!(events.is_empty());
        assert_eq!(engine.sound_count(SoundId::Bounce), 1);
        assert_eq!(session.score.value(), 190, "Landing never scores");

        let unknown = CollisionEvent::HazardLanded {
            hazard_id: HazardId(40),
        };
        dispatch(&mut session, unknown, &config, &mut engine, &mut rng);
        assert_eq!(engine.sound_count(SoundId::Bounce), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_is_ten_per_distinct_collection(
                picks in proptest::collection::vec(0usize..19, 0..60)
            ) {
                let config = StarCatchConfig::default();
                let (mut session, mut engine, mut rng) = setup(&config);
                let mut collected = 0u32;
                let mut active = [true; 19];
                for &i in &picks {
                    if active[i] {
                        collected += 1;
                        active[i] = false;
                        if active.iter().all(|a| !a) {
                            active = [true; 19];
                        }
                    }
                    collect(&mut session, i, &config, &mut engine, &mut rng);
                    prop_assert_eq!(session.score.value(), 10 * collected);
                }
            }

            #[test]
            fn hazards_spawn_away_from_player(
                player_x in 0.0f32..1600.0,
                seed in 0u64..500
            ) {
                let config = StarCatchConfig::default();
                let (mut session, mut engine, _) = setup(&config);
                let mut rng = StdRng::seed_from_u64(seed);
                engine.set_position(session.world.player.body, Vec2::new(player_x, 500.0));
                for i in 0..19 {
                    collect(&mut session, i, &config, &mut engine, &mut rng);
                }
                for h in &session.world.hazards {
                    if player_x < 800.0 {
                        prop_assert!(h.position.x >= 800.0);
                    } else {
                        prop_assert!(h.position.x <= 800.0);
                    }
                }
            }
        }
    }
}
