//! Rendering layer — all terminal drawing lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! world.  No game logic is performed; this module only translates state
//! into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

use crate::entities::{GameReport, Outcome, World, TARGET_PIECES};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TIMER: Color = Color::Yellow;
const C_CANNON: Color = Color::White;
const C_PROJECTILE: Color = Color::Cyan;
const C_BARRIER: Color = Color::Red;
const C_PIECE_EVEN: Color = Color::Yellow;
const C_PIECE_ODD: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

// ── Cell plotting helpers ─────────────────────────────────────────────────────

/// Put one glyph at a world coordinate, silently skipping anything that has
/// moved off the drawable area.
fn plot<W: Write>(out: &mut W, world: &World, pos: Vec2, glyph: &str) -> std::io::Result<()> {
    let x = pos.x.round();
    let y = pos.y.round();
    if x < 0.0 || y < 0.0 || x >= world.field.width || y >= world.field.height {
        return Ok(());
    }
    out.queue(cursor::MoveTo(x as u16, y as u16))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Plot a straight run of block glyphs between two world points.
fn draw_line<W: Write>(out: &mut W, world: &World, from: Vec2, to: Vec2) -> std::io::Result<()> {
    let delta = to - from;
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0);
    for i in 0..=steps as i32 {
        let t = i as f32 / steps;
        plot(out, world, from + delta * t, "█")?;
    }
    Ok(())
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_timer(out, world)?;
    draw_cannon(out, world)?;
    draw_barrier(out, world)?;
    draw_target(out, world)?;

    if world.projectile.on_screen {
        out.queue(style::SetForegroundColor(C_PROJECTILE))?;
        plot(out, world, world.projectile.pos, "●")?;
    }

    draw_controls_hint(out, world)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, world.field.height.max(1.0) as u16 - 1))?;
    out.flush()?;
    Ok(())
}

// ── Timer (row 0) ─────────────────────────────────────────────────────────────

fn draw_timer<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_TIMER))?;
    out.queue(Print(format!("Time remaining: {:4.1} s", world.time_left)))?;
    Ok(())
}

// ── Cannon ────────────────────────────────────────────────────────────────────

fn draw_cannon<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    let mouth = Vec2::new(0.0, world.field.height / 2.0);

    out.queue(style::SetForegroundColor(C_CANNON))?;

    // Barrel, pointing wherever the last touch aimed it
    draw_line(out, world, mouth, world.aim.barrel_end)?;

    // Base: a filled half-disc hugging the left edge
    let r = world.field.cannon_base_radius;
    let top = (mouth.y - r).ceil() as i32;
    let bottom = (mouth.y + r).floor() as i32;
    for row in top..=bottom {
        let dy = row as f32 - mouth.y;
        let half_width = (r * r - dy * dy).max(0.0).sqrt();
        for col in 0..=half_width as i32 {
            plot(out, world, Vec2::new(col as f32, row as f32), "█")?;
        }
    }
    Ok(())
}

// ── Barrier ───────────────────────────────────────────────────────────────────

fn draw_barrier<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BARRIER))?;
    draw_line(out, world, world.barrier.line.start, world.barrier.line.end)
}

// ── Target ────────────────────────────────────────────────────────────────────

/// Each unhit piece is a short vertical run, colours alternating by parity.
fn draw_target<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    let mut piece_top = world.target.line.start;
    for i in 0..TARGET_PIECES {
        if !world.target.hit[i] {
            let colour = if i % 2 != 0 { C_PIECE_ODD } else { C_PIECE_EVEN };
            out.queue(style::SetForegroundColor(colour))?;
            let piece_bottom = piece_top + Vec2::new(0.0, world.target.piece_length);
            draw_line(out, world, piece_top, piece_bottom)?;
        }
        piece_top.y += world.target.piece_length;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    let last_row = world.field.height.max(1.0) as u16 - 1;
    out.queue(cursor::MoveTo(1, last_row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("CLICK : Fire   P : Pause   R : Resume   N : New Game   Q : Quit"))?;
    Ok(())
}

// ── End-of-game overlay ───────────────────────────────────────────────────────

/// Draw the game-over summary.  Called by the host once the loop has
/// stopped; the world is only read for its dimensions.
pub fn render_summary<W: Write>(
    out: &mut W,
    world: &World,
    report: &GameReport,
) -> std::io::Result<()> {
    let (banner, colour) = match report.outcome {
        Outcome::Win => ("★  YOU  WIN  ★", Color::Green),
        _ => ("✗  TIME'S  UP  ✗", Color::Red),
    };
    let shots_line = format!("Shots fired: {}", report.shots_fired);
    let time_line = format!("Total time:  {:.1} s", report.total_elapsed);
    let hint = "N - New Game   Q - Quit";

    let cx = (world.field.width / 2.0) as u16;
    let cy = (world.field.height / 2.0) as u16;

    let lines: &[(&str, Color)] = &[
        (banner, colour),
        (shots_line.as_str(), Color::White),
        (time_line.as_str(), Color::White),
        (hint, C_HINT),
    ];
    for (i, (msg, col)) in lines.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        let column = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(column, row))?;
        out.queue(style::SetForegroundColor(*col))?;
        out.queue(Print(*msg))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
