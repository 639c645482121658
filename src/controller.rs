//! Game controller: wires the world, the loop driver and the host together.
//!
//! The host forwards its surface/input/lifecycle callbacks here; outbound
//! effect events and the end-of-game report travel over mpsc channels to
//! whatever collaborators the host attached.  One [`LoopDriver`] exists per
//! game session; it is torn down and recreated on restart.

use std::io::Write;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use glam::Vec2;

use crate::compute;
use crate::display;
use crate::driver::{lock, LoopDriver, Shared};
use crate::entities::{GameEvent, GameReport, World};

pub struct GameController<W: Write + Send + 'static> {
    shared: Arc<Mutex<Shared<W>>>,
    driver: Option<LoopDriver>,
    events: Sender<GameEvent>,
    reports: Sender<GameReport>,
    /// True while the host is showing the end-of-game summary; blocks input
    /// and keeps surface callbacks from restarting the loop mid-dialog.
    summary_shown: bool,
    event_buf: Vec<GameEvent>,
}

impl<W: Write + Send + 'static> GameController<W> {
    pub fn new(
        width: f32,
        height: f32,
        events: Sender<GameEvent>,
        reports: Sender<GameReport>,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                world: World::new(width, height),
                surface: None,
            })),
            driver: None,
            events,
            reports,
            summary_shown: false,
            event_buf: Vec::new(),
        }
    }

    pub fn shared(&self) -> &Arc<Mutex<Shared<W>>> {
        &self.shared
    }

    // ── Surface lifecycle ─────────────────────────────────────────────────────

    /// The host's drawable surface is available; start playing.
    pub fn on_surface_ready(&mut self, surface: W) {
        lock(&self.shared).surface = Some(surface);
        if !self.summary_shown {
            self.start_driver();
        }
    }

    /// Surface dimensions changed.  Serialized against any in-flight frame
    /// by the shared lock; all proportional quantities are recomputed and a
    /// fresh game begins at the new size.
    pub fn on_surface_resized(&mut self, width: f32, height: f32) {
        lock(&self.shared).world.resize(width, height);
        log::debug!("surface resized to {width}x{height}, game restarted");
        if !self.summary_shown && !self.driver_running() {
            self.start_driver();
        }
    }

    /// The surface is going away.  Stops the loop, waits for it to exit and
    /// hands the surface back to the host.
    pub fn on_surface_lost(&mut self) -> Option<W> {
        self.stop_driver();
        lock(&self.shared).surface.take()
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.fire_at(x, y);
    }

    pub fn on_pointer_drag(&mut self, x: f32, y: f32) {
        self.fire_at(x, y);
    }

    fn fire_at(&mut self, x: f32, y: f32) {
        if self.summary_shown {
            return;
        }
        {
            let mut guard = lock(&self.shared);
            compute::fire(&mut guard.world, Vec2::new(x, y), &mut self.event_buf);
        }
        // Lock released before the send; the collaborator never blocks a frame
        for ev in self.event_buf.drain(..) {
            let _ = self.events.send(ev);
        }
    }

    // ── Host lifecycle ────────────────────────────────────────────────────────

    /// Host is pausing: stop the loop after its current frame.
    pub fn pause(&mut self) {
        self.stop_driver();
    }

    /// Continue the current game after a pause.
    pub fn resume(&mut self) {
        if self.summary_shown || self.driver_running() {
            return;
        }
        if lock(&self.shared).surface.is_some() {
            self.start_driver();
        }
    }

    /// Reset the world in place and start a fresh session.  No-op without a
    /// surface to draw on.
    pub fn new_game(&mut self) {
        self.stop_driver();
        self.summary_shown = false;
        let has_surface = {
            let mut guard = lock(&self.shared);
            guard.world.reset_for_new_game();
            guard.surface.is_some()
        };
        if has_surface {
            self.start_driver();
        }
    }

    /// Host teardown.  Returns only after the loop thread has confirmed
    /// termination, so the host may release audio/graphics resources safely
    /// afterwards.
    pub fn destroy(&mut self) {
        self.stop_driver();
    }

    // ── End of game ───────────────────────────────────────────────────────────

    /// The host received the report and is about to present it.  Joins the
    /// (already exiting) driver and blocks restarts until `new_game`.
    pub fn on_game_over(&mut self) {
        self.summary_shown = true;
        self.stop_driver();
    }

    /// Draw the end-of-game summary into the surface, if one is present.
    pub fn show_summary(&mut self, report: &GameReport) -> std::io::Result<()> {
        let mut guard = lock(&self.shared);
        let shared = &mut *guard;
        if let Some(out) = shared.surface.as_mut() {
            display::render_summary(out, &shared.world, report)?;
        }
        Ok(())
    }

    // ── Driver management ─────────────────────────────────────────────────────

    fn driver_running(&self) -> bool {
        self.driver.as_ref().is_some_and(LoopDriver::is_running)
    }

    fn start_driver(&mut self) {
        if self.driver_running() {
            return;
        }
        // Reap a previously stopped driver before replacing it
        self.stop_driver();
        self.driver = Some(LoopDriver::start(
            Arc::clone(&self.shared),
            self.events.clone(),
            self.reports.clone(),
        ));
    }

    fn stop_driver(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.request_stop();
            driver.join();
        }
    }
}
