//! Point d'entrée de bws.
//!
//! Usage :
//!   bws [URL] [--url URL] [--width N] [--height N]
//!
//! Exemples :
//!   cargo run                       → charge http://www.google.com
//!   cargo run -- https://servo.org  → charge servo.org
//!   cargo run -- wikipedia.org      → ajoute https:// automatiquement
//!   cargo run -- --width 800 --height 600

use std::env;
use std::error::Error;

use tracing::{info, warn};
use winit::event_loop::EventLoop;

use bws::cli::CliArgs;
use bws::config::Config;
use bws::shell::App;
use bws::{lifecycle, resources, target};

fn main() -> Result<(), Box<dyn Error>> {
    // ── 1. Logging / Tracing ───────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    #[cfg(debug_assertions)]
    warn!("Running in DEBUG mode — pages will load very slowly. Use `cargo run --release` for normal speed.");

    // ── 2. Le moteur et la fenêtre restent sur le thread principal ─────
    lifecycle::ensure_ui_thread()?;

    // ── 3. Provider crypto TLS ─────────────────────────────────────────
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("Provider crypto rustls déjà installé");
    }

    // ── 4. Configuration et URL cible ──────────────────────────────────
    let mut config = Config::load();
    CliArgs::parse(env::args().skip(1))?.apply(&mut config);
    let url = target::resolve_target(&config)?;

    // ── 5. Lecteur de ressources Servo ─────────────────────────────────
    resources::init()?;

    // ── 6. Boucle d'événements Winit ───────────────────────────────────
    let event_loop = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config, url);

    event_loop.run_app(&mut app)?;

    info!(phase = ?app.phase(), "Boucle terminée");
    app.into_result()?;
    Ok(())
}
