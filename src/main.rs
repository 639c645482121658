use std::io::{stdout, BufWriter, Stdout};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    terminal, ExecutableCommand,
};

use cannonade::controller::GameController;
use cannonade::entities::GameEvent;

/// How long the UI loop waits on input before servicing the effect and
/// report channels.
const INPUT_POLL: Duration = Duration::from_millis(33);

type Surface = BufWriter<Stdout>;

// ── Effect collaborator ───────────────────────────────────────────────────────

/// The "audio" half of the game: each discrete effect becomes a terminal
/// bell plus a log line.  Writes to stderr so the drawing surface is never
/// touched from this thread.
fn play_effect(event: GameEvent) {
    eprint!("\x07");
    match event {
        GameEvent::CannonFired => log::debug!("effect: cannon fired"),
        GameEvent::BarrierHit => log::debug!("effect: barrier hit"),
        GameEvent::TargetHit => log::debug!("effect: target hit"),
    }
}

// ── UI loop ───────────────────────────────────────────────────────────────────

fn run(input: &Receiver<Event>) -> std::io::Result<()> {
    let (event_tx, event_rx) = mpsc::channel();
    let (report_tx, report_rx) = mpsc::channel();

    let (width, height) = terminal::size()?;
    let mut controller: GameController<Surface> =
        GameController::new(width as f32, height as f32, event_tx, report_tx);
    controller.on_surface_ready(BufWriter::new(stdout()));

    loop {
        // Wait briefly for input, then service the outbound channels
        match input.recv_timeout(INPUT_POLL) {
            Ok(Event::Mouse(mouse)) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    controller.on_pointer_down(mouse.column as f32, mouse.row as f32);
                }
                MouseEventKind::Drag(MouseButton::Left) => {
                    controller.on_pointer_drag(mouse.column as f32, mouse.row as f32);
                }
                _ => {}
            },
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char('p') | KeyCode::Char('P') => controller.pause(),
                KeyCode::Char('r') | KeyCode::Char('R') => controller.resume(),
                KeyCode::Char('n') | KeyCode::Char('N') => controller.new_game(),
                _ => {}
            },
            Ok(Event::Resize(w, h)) => controller.on_surface_resized(w as f32, h as f32),
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for effect in event_rx.try_iter() {
            play_effect(effect);
        }

        if let Ok(report) = report_rx.try_recv() {
            // Loop has stopped itself; present the summary and wait for
            // N (new game) or Q, handled by the match above
            controller.on_game_over();
            controller.show_summary(&report)?;
        }
    }

    // Join the loop thread before the terminal (and the bell "audio") go away
    controller.destroy();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init(); // logs go to stderr, clear of the drawing surface

    terminal::enable_raw_mode()?;
    stdout().execute(terminal::EnterAlternateScreen)?;
    stdout().execute(cursor::Hide)?;
    stdout().execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the UI loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&rx);

    // Always restore the terminal
    let _ = stdout().execute(DisableMouseCapture);
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
