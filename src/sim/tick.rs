//! Per-frame simulation step
//!
//! One explicit Euler step per display refresh: read held keys, integrate
//! velocity, clamp to the level, resolve obstacles in authoring order, then
//! check for a fall out of the level. Velocities are units per tick, so the
//! step is intentionally frame-rate dependent.

use glam::Vec2;

use super::collision::{Aabb, contact_side, resolve_contact};
use super::state::{Actor, Facing, Obstacle, ObstacleKind};
use super::status::StatusSignal;
use crate::clamp_to_level;
use crate::consts::*;
use crate::input::KeysState;

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Next actor state (the previous one, unchanged, when `signal` is set)
    pub actor: Actor,
    pub signal: Option<StatusSignal>,
}

impl StepOutcome {
    fn moved(actor: Actor) -> Self {
        Self {
            actor,
            signal: None,
        }
    }

    fn aborted(prev: &Actor, signal: StatusSignal) -> Self {
        Self {
            actor: *prev,
            signal: Some(signal),
        }
    }
}

/// Advance the actor by one tick against the current obstacles
///
/// `speed_multiplier` scales horizontal speed only. A hazard, the finish, or
/// falling below y = 0 aborts the tick: the previous actor is returned
/// untouched together with the status signal.
pub fn step(prev: &Actor, keys: KeysState, obstacles: &[Obstacle], speed_multiplier: f32) -> StepOutcome {
    let speed = PLAYER_SPEED * speed_multiplier;

    // Horizontal intent (right is applied last, so it wins)
    let mut vel_x = 0.0;
    let mut facing = prev.facing;
    if keys.left {
        vel_x = -speed;
        facing = Facing::Left;
    }
    if keys.right {
        vel_x = speed;
        facing = Facing::Right;
    }

    // Gravity always applies; a jump replaces it
    let mut vel_y = prev.vel.y - GRAVITY;
    if keys.up && prev.grounded {
        vel_y = JUMP_FORCE;
    }

    let mut vel = Vec2::new(vel_x, vel_y);
    let mut pos = prev.pos + vel;
    pos.x = clamp_to_level(pos.x);

    let prev_box = Aabb::actor(prev.pos);
    let mut grounded = false;

    for obstacle in obstacles {
        let obstacle_box = Aabb::of(obstacle);
        if !Aabb::actor(pos).overlaps(&obstacle_box) {
            continue;
        }

        match obstacle.kind {
            ObstacleKind::Hazard => {
                log::debug!("Hazard {} hit at {:?}", obstacle.id, pos);
                return StepOutcome::aborted(prev, StatusSignal::GameOver);
            }
            ObstacleKind::Finish => {
                log::debug!("Finish {} reached at {:?}", obstacle.id, pos);
                return StepOutcome::aborted(prev, StatusSignal::Win);
            }
            ObstacleKind::Platform => {
                // Corrections feed into later platforms through `vel`
                if let Some(side) = contact_side(&prev_box, &obstacle_box, vel) {
                    grounded |= resolve_contact(side, &obstacle_box, &mut pos, &mut vel);
                }
            }
        }
    }

    if pos.y < 0.0 {
        log::debug!("Fell out of the level at x={}", pos.x);
        return StepOutcome::aborted(prev, StatusSignal::GameOver);
    }

    StepOutcome::moved(Actor {
        pos,
        vel,
        grounded,
        facing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn floor() -> Obstacle {
        Obstacle::new(
            1,
            ObstacleKind::Platform,
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, GROUND_HEIGHT),
        )
    }

    fn actor_at(x: f32, y: f32, vel: Vec2, grounded: bool) -> Actor {
        Actor {
            pos: Vec2::new(x, y),
            vel,
            grounded,
            facing: Facing::Right,
        }
    }

    fn keys(left: bool, right: bool, up: bool) -> KeysState {
        KeysState { left, right, up }
    }

    #[test]
    fn test_rest_on_platform() {
        let prev = actor_at(50.0, GROUND_HEIGHT, Vec2::ZERO, true);
        let out = step(&prev, KeysState::default(), &[floor()], 1.0);

        assert_eq!(out.signal, None);
        assert_eq!(out.actor.pos, prev.pos);
        assert_eq!(out.actor.vel, Vec2::ZERO);
        assert!(out.actor.grounded);
    }

    #[test]
    fn test_hazard_below_falling_actor() {
        let prev = actor_at(300.0, 200.0, Vec2::new(0.0, -3.0), false);
        let hazard = Obstacle::new(
            3,
            ObstacleKind::Hazard,
            Vec2::new(300.0, 190.0),
            Vec2::new(20.0, 20.0),
        );
        let out = step(&prev, KeysState::default(), &[hazard], 1.0);

        assert_eq!(out.signal, Some(StatusSignal::GameOver));
        assert_eq!(out.actor, prev);
    }

    #[test]
    fn test_wall_from_left() {
        let wall = Obstacle::new(
            2,
            ObstacleKind::Platform,
            Vec2::new(100.0, 0.0),
            Vec2::new(40.0, 100.0),
        );
        let prev = actor_at(74.0, 50.0, Vec2::ZERO, false);
        let out = step(&prev, keys(false, true, false), &[wall], 1.0);

        assert_eq!(out.signal, None);
        assert_eq!(out.actor.pos.x, 100.0 - PLAYER_WIDTH);
        assert_eq!(out.actor.vel.x, 0.0);
        assert_eq!(out.actor.pos.y, 49.5);
    }

    #[test]
    fn test_wall_from_right() {
        let wall = Obstacle::new(
            2,
            ObstacleKind::Platform,
            Vec2::new(100.0, 0.0),
            Vec2::new(40.0, 100.0),
        );
        let prev = actor_at(142.0, 50.0, Vec2::ZERO, false);
        let out = step(&prev, keys(true, false, false), &[wall], 1.0);

        assert_eq!(out.actor.pos.x, 140.0);
        assert_eq!(out.actor.vel.x, 0.0);
        assert_eq!(out.actor.facing, Facing::Left);
    }

    #[test]
    fn test_head_bump() {
        let ceiling = Obstacle::new(
            6,
            ObstacleKind::Platform,
            Vec2::new(0.0, 100.0),
            Vec2::new(200.0, 20.0),
        );
        let prev = actor_at(50.0, 70.0, Vec2::new(0.0, 8.0), false);
        let out = step(&prev, KeysState::default(), &[ceiling], 1.0);

        assert_eq!(out.actor.pos.y, 100.0 - PLAYER_HEIGHT);
        assert_eq!(out.actor.vel.y, 0.0);
        assert!(!out.actor.grounded);
    }

    #[test]
    fn test_both_directions_right_wins() {
        let prev = actor_at(50.0, GROUND_HEIGHT, Vec2::ZERO, true);
        let mut left_facing = prev;
        left_facing.facing = Facing::Left;

        for multiplier in [0.5, 1.0, 2.5] {
            let out = step(&left_facing, keys(true, true, false), &[floor()], multiplier);
            assert_eq!(out.actor.vel.x, PLAYER_SPEED * multiplier);
            assert_eq!(out.actor.facing, Facing::Right);
        }
    }

    #[test]
    fn test_facing_kept_without_input() {
        let mut prev = actor_at(50.0, GROUND_HEIGHT, Vec2::ZERO, true);
        prev.facing = Facing::Left;
        let out = step(&prev, KeysState::default(), &[floor()], 1.0);
        assert_eq!(out.actor.facing, Facing::Left);
    }

    #[test]
    fn test_jump_requires_grounded_start() {
        let prev = actor_at(50.0, GROUND_HEIGHT, Vec2::ZERO, true);
        let out = step(&prev, keys(false, false, true), &[floor()], 1.0);
        assert_eq!(out.actor.vel.y, JUMP_FORCE);
        assert_eq!(out.actor.pos.y, GROUND_HEIGHT + JUMP_FORCE);
        assert!(!out.actor.grounded);
        assert!(out.actor.airborne());

        // Holding jump in the air only keeps falling back
        let next = step(&out.actor, keys(false, false, true), &[floor()], 1.0);
        assert_eq!(next.actor.vel.y, JUMP_FORCE - GRAVITY);
    }

    #[test]
    fn test_grounded_not_latched() {
        // Grounded previous tick, but nothing underneath now
        let prev = actor_at(500.0, 300.0, Vec2::ZERO, true);
        let out = step(&prev, KeysState::default(), &[], 1.0);
        assert!(!out.actor.grounded);
        assert_eq!(out.actor.vel.y, -GRAVITY);
    }

    #[test]
    fn test_finish_aborts_with_win() {
        let finish = Obstacle::new(
            12,
            ObstacleKind::Finish,
            Vec2::new(80.0, GROUND_HEIGHT),
            Vec2::new(10.0, 40.0),
        );
        let prev = actor_at(54.0, GROUND_HEIGHT, Vec2::ZERO, true);
        let out = step(&prev, keys(false, true, false), &[floor(), finish], 1.0);

        assert_eq!(out.signal, Some(StatusSignal::Win));
        assert_eq!(out.actor, prev);
    }

    #[test]
    fn test_hazard_after_platform_still_aborts() {
        let hazard = Obstacle::new(
            3,
            ObstacleKind::Hazard,
            Vec2::new(60.0, GROUND_HEIGHT),
            Vec2::new(20.0, 20.0),
        );
        let prev = actor_at(34.0, GROUND_HEIGHT, Vec2::ZERO, true);
        let out = step(&prev, keys(false, true, false), &[floor(), hazard], 1.0);
        assert_eq!(out.signal, Some(StatusSignal::GameOver));
        assert_eq!(out.actor, prev);
    }

    #[test]
    fn test_pit_aborts() {
        let prev = actor_at(300.0, 0.2, Vec2::new(0.0, -1.0), false);
        let out = step(&prev, KeysState::default(), &[floor()], 1.0);
        assert_eq!(out.signal, Some(StatusSignal::GameOver));
        assert_eq!(out.actor, prev);
    }

    #[test]
    fn test_level_bounds_clamp() {
        let prev = actor_at(1.0, 200.0, Vec2::ZERO, false);
        let out = step(&prev, keys(true, false, false), &[], 2.5);
        assert_eq!(out.actor.pos.x, 0.0);

        let prev = actor_at(LEVEL_WIDTH - PLAYER_WIDTH - 1.0, 200.0, Vec2::ZERO, false);
        let out = step(&prev, keys(false, true, false), &[], 2.5);
        assert_eq!(out.actor.pos.x, LEVEL_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_collision_order_matters() {
        let high = Obstacle::new(1, ObstacleKind::Platform, Vec2::ZERO, Vec2::new(200.0, 30.0));
        let low = Obstacle::new(2, ObstacleKind::Platform, Vec2::ZERO, Vec2::new(200.0, 28.0));
        let prev = actor_at(50.0, 31.0, Vec2::new(0.0, -3.5), false);

        let out = step(&prev, KeysState::default(), &[high.clone(), low.clone()], 1.0);
        assert_eq!(out.actor.pos.y, 30.0);

        // The first landing zeroes velocity, so the second platform is skipped
        let out = step(&prev, KeysState::default(), &[low, high], 1.0);
        assert_eq!(out.actor.pos.y, 28.0);
        assert!(out.actor.grounded);
    }

    #[test]
    fn test_preexisting_overlap_passes_through() {
        // Already embedded: no rule matches and the platform is ignored
        let prev = actor_at(50.0, 10.0, Vec2::ZERO, false);
        let out = step(&prev, KeysState::default(), &[floor()], 1.0);
        assert_eq!(out.signal, None);
        assert_eq!(out.actor.pos.y, 9.5);
        assert!(!out.actor.grounded);
    }

    proptest! {
        #[test]
        fn free_motion_is_exact_euler(
            x in 0.0f32..1400.0,
            y in 100.0f32..300.0,
            vy in -20.0f32..20.0,
            left in any::<bool>(),
            right in any::<bool>(),
            multiplier in 0.5f32..2.5,
        ) {
            let prev = actor_at(x, y, Vec2::new(0.0, vy), false);
            let out = step(&prev, keys(left, right, false), &[], multiplier);
            prop_assert_eq!(out.signal, None);

            let expected = prev.pos + out.actor.vel;
            prop_assert_eq!(out.actor.pos.y, expected.y);
            prop_assert_eq!(out.actor.pos.x, clamp_to_level(expected.x));
            prop_assert!(out.actor.pos.x >= 0.0);
            prop_assert!(out.actor.pos.x <= LEVEL_WIDTH - PLAYER_WIDTH);
            prop_assert_eq!(clamp_to_level(out.actor.pos.x), out.actor.pos.x);
        }

        #[test]
        fn landing_snaps_to_top(
            x in 10.0f32..150.0,
            gap in 0.0f32..20.0,
            fall in 0.0f32..50.0,
        ) {
            let prev = actor_at(x, GROUND_HEIGHT + gap, Vec2::new(0.0, -fall), false);
            let tentative_y = prev.pos.y + (-fall - GRAVITY);
            prop_assume!(tentative_y < GROUND_HEIGHT && tentative_y + PLAYER_HEIGHT > 0.0);

            let out = step(&prev, KeysState::default(), &[floor()], 1.0);
            prop_assert_eq!(out.signal, None);
            prop_assert_eq!(out.actor.vel.y, 0.0);
            prop_assert!(out.actor.grounded);
            prop_assert_eq!(out.actor.pos.y, GROUND_HEIGHT);
        }

        #[test]
        fn hazard_and_finish_leave_actor_untouched(
            x in 200.0f32..1200.0,
            y in 100.0f32..300.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
            grounded in any::<bool>(),
            finish in any::<bool>(),
            up in any::<bool>(),
        ) {
            let prev = actor_at(x, y, Vec2::new(vx, vy), grounded);
            let kind = if finish { ObstacleKind::Finish } else { ObstacleKind::Hazard };
            let obstacle = Obstacle::new(
                7,
                kind,
                prev.pos - Vec2::splat(100.0),
                Vec2::splat(200.0),
            );
            let out = step(&prev, keys(false, true, up), &[obstacle], 1.5);

            let expected = if finish { StatusSignal::Win } else { StatusSignal::GameOver };
            prop_assert_eq!(out.signal, Some(expected));
            prop_assert_eq!(out.actor, prev);
        }

        #[test]
        fn pit_leaves_actor_untouched(
            x in 0.0f32..1400.0,
            y in 0.0f32..10.0,
            vy in -30.0f32..-10.0,
        ) {
            let prev = actor_at(x, y, Vec2::new(0.0, vy), false);
            let out = step(&prev, KeysState::default(), &[], 1.0);
            prop_assert_eq!(out.signal, Some(StatusSignal::GameOver));
            prop_assert_eq!(out.actor, prev);
        }
    }
}
