//! Game-logic functions: the per-frame simulation step and the pointer →
//! cannon-shot input mapping.
//!
//! Both mutate the [`World`] in place and report side effects by pushing
//! [`GameEvent`]s into a caller-owned buffer; actually playing a sound or
//! showing a dialog is the host's business.

use std::f32::consts::PI;

use glam::Vec2;

use crate::entities::{
    GameEvent, Outcome, World, HIT_REWARD, MISS_PENALTY, TARGET_PIECES,
};

// ── Simulation step ───────────────────────────────────────────────────────────

/// Advance the world by `dt` seconds of wall-clock time.
///
/// `dt` must be ≥ 0; the caller computes it as the delta since the previous
/// frame.  Exactly one collision rule applies per step (first match wins):
/// barrier deflection, side-wall exit, top/bottom exit, target hit.  The
/// countdown runs last, so completing the final piece wins even in a frame
/// that would also exhaust the timer.
pub fn step(world: &mut World, dt: f32, events: &mut Vec<GameEvent>) -> Outcome {
    let mut outcome = Outcome::Continue;
    let width = world.field.width;
    let height = world.field.height;

    // ── 1. Projectile motion & collisions ────────────────────────────────────
    if world.projectile.on_screen {
        world.projectile.pos += world.projectile.vel * dt;

        let pos = world.projectile.pos;
        let r = world.projectile.radius;

        if pos.x + r > world.barrier.distance
            && pos.x - r < world.barrier.distance
            && pos.y + r > world.barrier.line.start.y
            && pos.y - r < world.barrier.line.end.y
        {
            // Deflected: reverse course and penalize
            world.projectile.vel.x = -world.projectile.vel.x;
            world.time_left = (world.time_left - MISS_PENALTY).max(0.0);
            events.push(GameEvent::BarrierHit);
        } else if pos.x + r > width || pos.x - r < 0.0 {
            world.projectile.on_screen = false;
            events.push(GameEvent::BarrierHit);
        } else if pos.y + r > height || pos.y - r < 0.0 {
            world.projectile.on_screen = false;
        } else if pos.x + r > world.target.distance
            && pos.x - r < world.target.distance
            && pos.y + r > world.target.line.start.y
            && pos.y - r < world.target.line.end.y
        {
            // Which section did we pass through?  0 is the topmost.
            let section =
                ((pos.y - world.target.line.start.y) / world.target.piece_length) as i32;

            if (0..TARGET_PIECES as i32).contains(&section)
                && !world.target.hit[section as usize]
            {
                world.target.hit[section as usize] = true;
                world.projectile.on_screen = false;
                world.time_left += HIT_REWARD;
                events.push(GameEvent::TargetHit);

                world.pieces_hit += 1;
                if world.pieces_hit == TARGET_PIECES {
                    outcome = Outcome::Win;
                    world.game_over = true;
                }
            }
        }
    }

    // ── 2. Barrier & target motion ────────────────────────────────────────────
    world.barrier.line.translate_y(world.barrier.velocity * dt);
    world.target.line.translate_y(world.target.velocity * dt);

    if world.barrier.line.start.y < 0.0 || world.barrier.line.end.y > height {
        world.barrier.velocity = -world.barrier.velocity;
    }
    if world.target.line.start.y < 0.0 || world.target.line.end.y > height {
        world.target.velocity = -world.target.velocity;
    }

    // ── 3. Countdown ──────────────────────────────────────────────────────────
    world.total_elapsed += dt;
    world.time_left = (world.time_left - dt).max(0.0);

    if world.time_left <= 0.0 && outcome != Outcome::Win {
        world.time_left = 0.0;
        outcome = Outcome::Lose;
        world.game_over = true;
    }

    outcome
}

// ── Input mapping ─────────────────────────────────────────────────────────────

/// Point the barrel at `touch` and return the firing angle in radians.
///
/// The angle is measured from straight up: `atan(x / (h/2 − y))`, plus π for
/// touches below the vertical centre so downward shots aim down instead of
/// mirroring up.  A touch exactly on the centre line degenerates to angle 0.
pub fn align_cannon(world: &mut World, touch: Vec2) -> f32 {
    let half_height = world.field.height / 2.0;
    let center_minus_y = half_height - touch.y;

    let mut angle = 0.0;
    if center_minus_y != 0.0 {
        angle = (touch.x / center_minus_y).atan();
    }
    if touch.y > half_height {
        angle += PI;
    }

    let length = world.field.cannon_length;
    world.aim.barrel_end = Vec2::new(
        length * angle.sin(),
        half_height - length * angle.cos(),
    );
    world.aim.angle = angle;
    angle
}

/// Fire the cannon toward `touch`.
///
/// A no-op (returns `None`) while a projectile is already on screen —
/// at most one shot is in flight at a time.
pub fn fire(world: &mut World, touch: Vec2, events: &mut Vec<GameEvent>) -> Option<f32> {
    if world.projectile.on_screen {
        return None;
    }

    let angle = align_cannon(world, touch);
    let speed = world.field.projectile_speed;

    // Shot starts inside the cannon mouth, vertically centred
    world.projectile.pos = Vec2::new(
        world.projectile.radius,
        world.field.height / 2.0,
    );
    world.projectile.vel = Vec2::new(speed * angle.sin(), -speed * angle.cos());
    world.projectile.on_screen = true;
    world.shots_fired += 1;
    events.push(GameEvent::CannonFired);

    Some(angle)
}
