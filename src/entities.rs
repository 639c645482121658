//! All game entity types — pure data, no logic.
//!
//! World coordinates are f32 terminal cells, x growing right and y growing
//! down.  The cannon sits at the left edge, vertically centred; the barrier
//! and target are vertical segments that slide along y.

use glam::Vec2;

// ── Gameplay constants ────────────────────────────────────────────────────────

/// Number of sections in the target.
pub const TARGET_PIECES: usize = 7;
/// Seconds subtracted when a shot is deflected by the barrier.
pub const MISS_PENALTY: f32 = 2.0;
/// Seconds added when a shot takes out a target piece.
pub const HIT_REWARD: f32 = 3.0;
/// Countdown at the start of every game, in seconds.
pub const START_TIME: f32 = 10.0;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A line segment between two points.
///
/// Barrier and target segments happen to be vertical (constant x, only y
/// changes while they move) but the type places no such restriction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// A vertical segment at column `x` spanning `top..bottom`.
    pub fn vertical(x: f32, top: f32, bottom: f32) -> Self {
        Self::new(Vec2::new(x, top), Vec2::new(x, bottom))
    }

    /// Slide the whole segment along the y axis.
    pub fn translate_y(&mut self, dy: f32) {
        self.start.y += dy;
        self.end.y += dy;
    }
}

// ── Moving obstacles ──────────────────────────────────────────────────────────

/// The moving obstacle between cannon and target.  Deflects the projectile
/// and costs the player [`MISS_PENALTY`] seconds on contact.
#[derive(Clone, Debug, PartialEq)]
pub struct Barrier {
    pub line: Segment,
    /// Fixed distance from the left edge of the field.
    pub distance: f32,
    /// Velocity along y, cells/sec.  Sign flips at the field edges.
    pub velocity: f32,
}

/// The moving objective: a vertical segment split into [`TARGET_PIECES`]
/// equal sections, each of which scores once.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub line: Segment,
    pub distance: f32,
    pub velocity: f32,
    /// Length of one section, cells.
    pub piece_length: f32,
    /// Per-piece hit flags; a hit piece stays hit until the next new game.
    pub hit: [bool; TARGET_PIECES],
}

// ── Projectile & aim ──────────────────────────────────────────────────────────

/// The cannonball.  At most one exists at a time; it only participates in
/// the simulation while `on_screen` is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub on_screen: bool,
}

/// Where the cannon barrel currently points — derived purely from the most
/// recent pointer location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aim {
    pub barrel_end: Vec2,
    pub angle: f32,
}

// ── Field proportions ─────────────────────────────────────────────────────────

/// Field dimensions plus every quantity derived proportionally from them.
/// Rebuilt whenever the drawable surface changes size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    pub cannon_base_radius: f32,
    pub cannon_length: f32,
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub line_width: f32,
    pub barrier_distance: f32,
    pub barrier_beginning: f32,
    pub barrier_end: f32,
    pub barrier_start_velocity: f32,
    pub target_distance: f32,
    pub target_beginning: f32,
    pub target_end: f32,
    pub piece_length: f32,
    pub target_start_velocity: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        let target_beginning = height / 8.0;
        let target_end = height * 7.0 / 8.0;
        Self {
            width,
            height,
            cannon_base_radius: height / 18.0,
            cannon_length: width / 8.0,
            projectile_radius: width / 36.0,
            projectile_speed: width * 3.0 / 2.0,
            line_width: width / 24.0,
            barrier_distance: width * 5.0 / 8.0,
            barrier_beginning: height / 8.0,
            barrier_end: height * 3.0 / 8.0,
            // Barrier starts moving down, target up — asymmetric on purpose
            barrier_start_velocity: height / 2.0,
            target_distance: width * 7.0 / 8.0,
            target_beginning,
            target_end,
            piece_length: (target_end - target_beginning) / TARGET_PIECES as f32,
            target_start_velocity: -height / 4.0,
        }
    }
}

// ── Outbound signals ──────────────────────────────────────────────────────────

/// Terminal classification of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Win,
    Lose,
}

/// Discrete effect signals for an external audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CannonFired,
    BarrierHit,
    TargetHit,
}

/// End-of-game summary for an external presentation collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameReport {
    pub outcome: Outcome,
    pub shots_fired: u32,
    pub total_elapsed: f32,
}

// ── Master world state ────────────────────────────────────────────────────────

/// Everything the simulation reads and writes.  Created once per surface and
/// mutated in place; `reset_for_new_game` restores it without reallocating.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub field: Field,
    pub barrier: Barrier,
    pub target: Target,
    pub projectile: Projectile,
    pub aim: Aim,
    pub time_left: f32,
    pub shots_fired: u32,
    pub total_elapsed: f32,
    pub pieces_hit: usize,
    pub game_over: bool,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        let field = Field::new(width, height);
        let mut world = Self {
            field,
            barrier: Barrier {
                line: Segment::vertical(
                    field.barrier_distance,
                    field.barrier_beginning,
                    field.barrier_end,
                ),
                distance: field.barrier_distance,
                velocity: field.barrier_start_velocity,
            },
            target: Target {
                line: Segment::vertical(
                    field.target_distance,
                    field.target_beginning,
                    field.target_end,
                ),
                distance: field.target_distance,
                velocity: field.target_start_velocity,
                piece_length: field.piece_length,
                hit: [false; TARGET_PIECES],
            },
            projectile: Projectile {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                radius: field.projectile_radius,
                on_screen: false,
            },
            aim: Aim {
                barrel_end: Vec2::new(field.cannon_length, height / 2.0),
                angle: 0.0,
            },
            time_left: START_TIME,
            shots_fired: 0,
            total_elapsed: 0.0,
            pieces_hit: 0,
            game_over: false,
        };
        world.reset_for_new_game();
        world
    }

    /// Recompute all proportional quantities for new surface dimensions and
    /// start over.  Called on every surface-size change.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = Field::new(width, height);
        self.reset_for_new_game();
    }

    /// Restore the starting state in place: clear hit flags and counters,
    /// rewind the countdown, remove the projectile and park barrier and
    /// target at their field-derived positions and initial velocities.
    pub fn reset_for_new_game(&mut self) {
        let f = &self.field;

        self.target.hit = [false; TARGET_PIECES];
        self.pieces_hit = 0;

        self.barrier.distance = f.barrier_distance;
        self.barrier.velocity = f.barrier_start_velocity;
        self.barrier.line =
            Segment::vertical(f.barrier_distance, f.barrier_beginning, f.barrier_end);

        self.target.distance = f.target_distance;
        self.target.velocity = f.target_start_velocity;
        self.target.piece_length = f.piece_length;
        self.target.line =
            Segment::vertical(f.target_distance, f.target_beginning, f.target_end);

        self.projectile.on_screen = false;
        self.projectile.pos = Vec2::ZERO;
        self.projectile.vel = Vec2::ZERO;
        self.projectile.radius = f.projectile_radius;

        self.aim.barrel_end = Vec2::new(f.cannon_length, f.height / 2.0);
        self.aim.angle = 0.0;

        self.time_left = START_TIME;
        self.shots_fired = 0;
        self.total_elapsed = 0.0;
        self.game_over = false;
    }
}
