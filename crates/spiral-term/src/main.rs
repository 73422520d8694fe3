#![forbid(unsafe_code)]

//! spiral-term binary entry point.

mod app;
mod cli;
mod term_surface;

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber when `SPIRAL_LOG` is set. Stdout belongs to
/// the renderer.
fn init_logging() {
    if std::env::var_os("SPIRAL_LOG").is_none() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("SPIRAL_LOG"))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn main() {
    let opts = cli::Opts::parse();
    init_logging();

    if let Err(e) = app::run(&opts) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
