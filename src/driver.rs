//! The game-loop driver: one dedicated thread that repeatedly measures the
//! wall-clock delta, advances the simulation and draws the frame, pacing
//! itself to the frame budget.
//!
//! The loop and the host's input handling share one mutex over
//! ([`World`], surface); the loop holds it for the whole of step+render so
//! a fire request or resize can never interleave with an in-flight frame.
//! Stopping is cooperative: the flag is observed at the top of each
//! iteration and the current frame always completes.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::compute;
use crate::display;
use crate::entities::{GameEvent, GameReport, Outcome, World};

/// Frame budget.
pub const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Everything both threads touch, guarded by a single mutex.
///
/// `surface` is `None` until the host hands one over (and again after it is
/// lost); the loop keeps simulating and simply skips drawing meanwhile.
pub struct Shared<W> {
    pub world: World,
    pub surface: Option<W>,
}

/// Acquire the shared lock, recovering from poisoning.  A frame that
/// panicked mid-draw must not wedge input handling or teardown.
pub fn lock<T>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running (or stopped) game-loop thread.
pub struct LoopDriver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LoopDriver {
    /// Spawn the loop thread and start it immediately.
    pub fn start<W: Write + Send + 'static>(
        shared: Arc<Mutex<Shared<W>>>,
        events: Sender<GameEvent>,
        reports: Sender<GameReport>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || run_loop(shared, flag, events, reports));
        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Ask the loop to exit after its current iteration.  Returns at once.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Block until the loop thread has fully exited.  A panicked worker is
    /// logged and otherwise swallowed so teardown always completes.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("game loop thread panicked");
            }
        }
    }
}

impl Drop for LoopDriver {
    fn drop(&mut self) {
        self.request_stop();
        self.join();
    }
}

// ── Loop body ─────────────────────────────────────────────────────────────────

fn run_loop<W: Write + Send>(
    shared: Arc<Mutex<Shared<W>>>,
    running: Arc<AtomicBool>,
    events: Sender<GameEvent>,
    reports: Sender<GameReport>,
) {
    log::debug!("game loop started");

    let mut event_buf: Vec<GameEvent> = Vec::new();
    let mut previous = Instant::now();

    while running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();
        let mut finished = None;

        {
            let mut guard = lock(&shared);
            let shared = &mut *guard;

            let dt = frame_start.duration_since(previous).as_secs_f32();
            previous = frame_start;

            let outcome = compute::step(&mut shared.world, dt, &mut event_buf);
            for ev in event_buf.drain(..) {
                let _ = events.send(ev);
            }

            match shared.surface.as_mut() {
                Some(out) => {
                    if let Err(err) = display::render(out, &shared.world) {
                        log::warn!("render failed, frame skipped: {err}");
                    }
                }
                // No surface yet (or it was lost): skip drawing this frame
                None => log::trace!("no surface, frame not drawn"),
            }

            if outcome != Outcome::Continue {
                finished = Some(GameReport {
                    outcome,
                    shots_fired: shared.world.shots_fired,
                    total_elapsed: shared.world.total_elapsed,
                });
            }
        }

        if let Some(report) = finished {
            // The loop exits right here, so the report goes out exactly once
            // even if a racing final frame would also have been terminal.
            running.store(false, Ordering::SeqCst);
            log::info!(
                "game over: {:?} after {} shots, {:.1} s",
                report.outcome,
                report.shots_fired,
                report.total_elapsed
            );
            let _ = reports.send(report);
            break;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }

    log::debug!("game loop stopped");
}
