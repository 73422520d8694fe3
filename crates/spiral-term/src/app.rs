#![forbid(unsafe_code)]

//! Terminal event loop: key triggers plus frame pumping.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use spiral_core::{SeededRandom, Surface, SurfaceController};

use crate::cli::Opts;
use crate::term_surface::{TermSurface, TerminalGuard};

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Quit,
}

/// Map a key event to an action. Releases and repeats are ignored.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('s') => Some(Action::Start),
        KeyCode::Char('x') | KeyCode::Char(' ') => Some(Action::Stop),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// One-line summary shown in the terminal title.
pub fn status_line<S: Surface>(controller: &SurfaceController<S>) -> String {
    let state = if controller.is_running() {
        "running"
    } else {
        "stopped"
    };
    format!(
        "spiral: {state} | frame {} | {} active / {} paths | s start, x stop, q quit",
        controller.frame_count(),
        controller.active_path_count(),
        controller.paths().len(),
    )
}

/// Run the animation until the user quits.
pub fn run(opts: &Opts) -> io::Result<()> {
    let config = opts.config();
    let random = match opts.seed {
        Some(seed) => SeededRandom::from_seed(seed),
        None => SeededRandom::from_entropy(),
    };

    let guard = TerminalGuard::enter()?;
    let (cols, rows) = guard.size()?;
    let surface: TermSurface<Stdout> = TermSurface::new(io::stdout(), cols, rows);
    let mut controller = SurfaceController::with_config(surface, opts.layout, config, random)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    tracing::info!(cols, rows, layout = ?opts.layout, "terminal session started");

    if opts.autostart {
        controller.start();
    }
    let poll_interval = config.frame_interval().max(Duration::from_millis(1));
    let mut last_status = String::new();

    loop {
        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                match action_for(key) {
                    Some(Action::Start) => controller.start(),
                    Some(Action::Stop) => controller.stop(),
                    Some(Action::Quit) => break,
                    None => {}
                }
            }
        }

        controller.pump();

        let status = status_line(&controller);
        if status != last_status {
            controller.surface_mut().set_status(&status);
            last_status = status;
        }
        if let Some(err) = controller.surface_mut().take_error() {
            return Err(err);
        }
    }

    controller.stop();
    tracing::info!(frames = controller.frame_count(), "terminal session ended");
    Ok(())
}
