use cannonade::compute::*;
use cannonade::entities::*;

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

/// 800×600 field: barrier at x=500 spanning y 75..225, target at x=700
/// spanning y 75..525, piece length 450/7, projectile radius 800/36.
fn make_world() -> World {
    World::new(800.0, 600.0)
}

/// A world with stationary barrier and target, for collision scenarios that
/// should not depend on entity motion within the step.
fn make_still_world() -> World {
    let mut w = make_world();
    w.barrier.velocity = 0.0;
    w.target.velocity = 0.0;
    w
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── step — no projectile ──────────────────────────────────────────────────────

#[test]
fn step_without_projectile_only_moves_entities_and_timer() {
    let mut w = make_world();
    let mut events = Vec::new();

    let outcome = step(&mut w, 0.1, &mut events);

    assert_eq!(outcome, Outcome::Continue);
    // Barrier moves down at h/2 = 300 cells/s, target up at h/4 = 150 cells/s
    assert!(approx(w.barrier.line.start.y, 75.0 + 30.0));
    assert!(approx(w.target.line.start.y, 75.0 - 15.0));
    assert!(approx(w.time_left, 9.9));
    assert!(approx(w.total_elapsed, 0.1));
    // Score counters untouched
    assert_eq!(w.shots_fired, 0);
    assert_eq!(w.pieces_hit, 0);
    assert!(events.is_empty());
}

#[test]
fn step_with_zero_dt_changes_nothing_measurable() {
    let mut w = make_world();
    let before = w.clone();
    let mut events = Vec::new();

    let outcome = step(&mut w, 0.0, &mut events);

    assert_eq!(outcome, Outcome::Continue);
    assert_eq!(w, before);
    assert!(events.is_empty());
}

// ── step — boundary reflection ────────────────────────────────────────────────

#[test]
fn barrier_reflects_at_bottom() {
    let mut w = make_world();
    let mut events = Vec::new();

    // Barrier end starts at 225 moving down at 300 cells/s; 1.3 s puts it
    // at 615, past the 600-cell bottom
    step(&mut w, 1.3, &mut events);

    assert!(approx(w.barrier.velocity, -300.0));
}

#[test]
fn target_reflects_at_top() {
    let mut w = make_world();
    let mut events = Vec::new();

    // Target start at 75 moving up at 150 cells/s; 1.3 s puts it at -120
    step(&mut w, 1.3, &mut events);

    assert!(approx(w.target.velocity, 150.0));
}

// ── step — barrier deflection ─────────────────────────────────────────────────

#[test]
fn projectile_deflected_by_barrier() {
    let mut w = make_still_world();
    w.projectile.on_screen = true;
    w.projectile.pos = Vec2::new(490.0, 150.0);
    w.projectile.vel = Vec2::new(1200.0, 0.0);
    let mut events = Vec::new();

    let outcome = step(&mut w, 0.001, &mut events);

    assert_eq!(outcome, Outcome::Continue);
    // x-velocity reversed, miss penalty charged, ball still in play
    assert!(approx(w.projectile.vel.x, -1200.0));
    assert!(approx(w.time_left, START_TIME - MISS_PENALTY - 0.001));
    assert!(w.projectile.on_screen);
    assert_eq!(events, vec![GameEvent::BarrierHit]);
}

#[test]
fn barrier_penalty_never_drives_timer_negative() {
    let mut w = make_still_world();
    w.time_left = 1.0; // less than the 2 s penalty
    w.projectile.on_screen = true;
    w.projectile.pos = Vec2::new(490.0, 150.0);
    w.projectile.vel = Vec2::new(1200.0, 0.0);
    let mut events = Vec::new();

    let outcome = step(&mut w, 0.001, &mut events);

    assert!(w.time_left >= 0.0);
    assert!(approx(w.time_left, 0.0));
    // Timer hit zero without a win, so the game is lost this same step
    assert_eq!(outcome, Outcome::Lose);
}

// ── step — wall exits ─────────────────────────────────────────────────────────

#[test]
fn projectile_leaves_through_side_wall_with_effect() {
    let mut w = make_still_world();
    w.projectile.on_screen = true;
    w.projectile.pos = Vec2::new(790.0, 300.0);
    w.projectile.vel = Vec2::new(1200.0, 0.0);
    let mut events = Vec::new();

    step(&mut w, 0.01, &mut events);

    assert!(!w.projectile.on_screen);
    assert_eq!(events, vec![GameEvent::BarrierHit]);
}

#[test]
fn projectile_leaves_through_top_silently() {
    let mut w = make_still_world();
    w.projectile.on_screen = true;
    w.projectile.pos = Vec2::new(300.0, 5.0);
    w.projectile.vel = Vec2::new(0.0, -1200.0);
    let mut events = Vec::new();

    step(&mut w, 0.01, &mut events);

    assert!(!w.projectile.on_screen);
    assert!(events.is_empty());
}

// ── step — target hits ────────────────────────────────────────────────────────

#[test]
fn horizontal_shot_hits_middle_piece() {
    // Straight shot at mid-height reaches the target band at y = 300;
    // piece index = floor((300 − 75) / (450/7)) = 3
    let mut w = make_still_world();
    w.projectile.on_screen = true;
    w.projectile.pos = Vec2::new(690.0, 300.0);
    w.projectile.vel = Vec2::new(1200.0, 0.0);
    let mut events = Vec::new();

    let outcome = step(&mut w, 0.01, &mut events);

    assert_eq!(outcome, Outcome::Continue);
    assert!(w.target.hit[3]);
    assert_eq!(w.pieces_hit, 1);
    assert!(!w.projectile.on_screen);
    assert!(approx(w.time_left, START_TIME + HIT_REWARD - 0.01));
    assert_eq!(events, vec![GameEvent::TargetHit]);
}

#[test]
fn already_hit_piece_cannot_score_again() {
    let mut w = make_still_world();
    w.target.hit[3] = true;
    w.pieces_hit = 1;
    w.projectile.on_screen = true;
    w.projectile.pos = Vec2::new(690.0, 300.0);
    w.projectile.vel = Vec2::new(1200.0, 0.0);
    let mut events = Vec::new();

    step(&mut w, 0.01, &mut events);

    // No score change, no reward; the ball just keeps flying
    assert_eq!(w.pieces_hit, 1);
    assert!(w.projectile.on_screen);
    assert!(approx(w.time_left, START_TIME - 0.01));
    assert!(events.is_empty());
}

#[test]
fn final_piece_wins_even_when_timer_expires_same_step() {
    let mut w = make_still_world();
    for i in 0..TARGET_PIECES {
        if i != 3 {
            w.target.hit[i] = true;
        }
    }
    w.pieces_hit = TARGET_PIECES - 1;
    w.time_left = 0.5;
    w.projectile.on_screen = true;
    w.projectile.pos = Vec2::new(690.0, 300.0);
    // Slow ball: after 4 s it sits at x = 698, inside the target band
    w.projectile.vel = Vec2::new(2.0, 0.0);
    let mut events = Vec::new();

    // dt large enough to exhaust the timer even after the +3 s reward
    let outcome = step(&mut w, 4.0, &mut events);

    assert_eq!(outcome, Outcome::Win);
    assert_eq!(w.pieces_hit, TARGET_PIECES);
    assert!(w.game_over);
    assert!(approx(w.time_left, 0.0));
}

// ── step — countdown ──────────────────────────────────────────────────────────

#[test]
fn timer_expiry_loses() {
    let mut w = make_world();
    w.time_left = 0.5;
    let mut events = Vec::new();

    let outcome = step(&mut w, 1.0, &mut events);

    assert_eq!(outcome, Outcome::Lose);
    assert_eq!(w.time_left, 0.0);
    assert!(w.game_over);
}

#[test]
fn timer_never_goes_below_zero() {
    let mut w = make_world();
    w.time_left = 0.2;
    let mut events = Vec::new();

    step(&mut w, 5.0, &mut events);

    assert_eq!(w.time_left, 0.0);
}

#[test]
fn total_elapsed_accumulates_monotonically() {
    let mut w = make_world();
    let mut events = Vec::new();

    step(&mut w, 0.25, &mut events);
    step(&mut w, 0.5, &mut events);

    assert!(approx(w.total_elapsed, 0.75));
}

// ── fire ──────────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_projectile_at_cannon_mouth() {
    let mut w = make_world();
    let mut events = Vec::new();

    let angle = fire(&mut w, Vec2::new(100.0, 150.0), &mut events);

    assert!(angle.is_some());
    assert!(w.projectile.on_screen);
    assert!(approx(w.projectile.pos.x, w.projectile.radius));
    assert!(approx(w.projectile.pos.y, 300.0));
    assert_eq!(w.shots_fired, 1);
    assert_eq!(events, vec![GameEvent::CannonFired]);
}

#[test]
fn fire_above_center_aims_up_and_right() {
    let mut w = make_world();
    let mut events = Vec::new();

    fire(&mut w, Vec2::new(100.0, 150.0), &mut events);

    assert!(w.projectile.vel.x > 0.0);
    assert!(w.projectile.vel.y < 0.0); // up
}

#[test]
fn fire_below_center_aims_down() {
    let mut w = make_world();
    let mut events = Vec::new();

    let angle = fire(&mut w, Vec2::new(100.0, 450.0), &mut events).unwrap();

    // π added for touches below the vertical centre
    assert!(angle > FRAC_PI_2 && angle < PI);
    assert!(w.projectile.vel.x > 0.0);
    assert!(w.projectile.vel.y > 0.0); // down
}

#[test]
fn fire_at_center_line_degenerates_to_angle_zero() {
    let mut w = make_world();
    let mut events = Vec::new();

    let angle = fire(&mut w, Vec2::new(100.0, 300.0), &mut events).unwrap();

    assert_eq!(angle, 0.0);
    assert!(approx(w.projectile.vel.x, 0.0));
    assert!(w.projectile.vel.y < 0.0); // straight up
}

#[test]
fn fire_while_projectile_active_is_noop() {
    let mut w = make_world();
    let mut events = Vec::new();
    fire(&mut w, Vec2::new(100.0, 150.0), &mut events);
    events.clear();
    let before = w.clone();

    let angle = fire(&mut w, Vec2::new(700.0, 500.0), &mut events);

    assert!(angle.is_none());
    assert_eq!(w, before); // nothing changed, shots_fired included
    assert!(events.is_empty());
}

// ── align_cannon ──────────────────────────────────────────────────────────────

#[test]
fn align_cannon_places_barrel_end() {
    let mut w = make_world();

    let angle = align_cannon(&mut w, Vec2::new(100.0, 150.0));

    // atan(100 / (300 − 150)) ≈ 0.588 rad; barrel length is w/8 = 100
    assert!(approx(angle, (100.0f32 / 150.0).atan()));
    assert!(approx(w.aim.barrel_end.x, 100.0 * angle.sin()));
    assert!(approx(w.aim.barrel_end.y, 300.0 - 100.0 * angle.cos()));
}

#[test]
fn align_cannon_straight_up_for_center_touch() {
    let mut w = make_world();

    let angle = align_cannon(&mut w, Vec2::new(42.0, 300.0));

    assert_eq!(angle, 0.0);
    assert!(approx(w.aim.barrel_end.x, 0.0));
    assert!(approx(w.aim.barrel_end.y, 200.0)); // h/2 − cannon length
}
