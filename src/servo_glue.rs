//! Couche d'intégration entre Servo et la coquille.
//!
//! 1. **[`Waker`] / [`WakerEvent`]** : le pont `Send + Sync` entre les threads
//!    internes de Servo (Constellation, script, réseau) et le thread principal
//!    Winit. C'est le seul mécanisme de synchronisation inter-threads.
//!
//! 2. **[`WebViewDelegate`] pour [`ShellState`]** : callbacks invoqués par
//!    Servo pour notifier l'embedder (nouveau frame, titre, URL, chargement).

use servo::{LoadStatus, WebView, WebViewDelegate};
use tracing::{debug, info, warn};
use url::Url;
use winit::event_loop::{EventLoop, EventLoopProxy};

use crate::shell::ShellState;

// ─────────────────────────────────────────────────────────────────────────────
// Waker : pont Servo → Winit
// ─────────────────────────────────────────────────────────────────────────────

/// Événement marqueur envoyé à travers le `EventLoopProxy` de Winit.
///
/// La boucle Winit le reçoit dans `user_event()` et appelle
/// `servo.spin_event_loop()` en réponse.
#[derive(Debug)]
pub struct WakerEvent;

/// Pont thread-safe entre les threads de Servo et la boucle d'événements.
///
/// `Clone + Send + Sync` car `EventLoopProxy` l'est, comme l'exige
/// `EventLoopWaker: 'static + Send + Sync`.
#[derive(Clone)]
pub struct Waker(EventLoopProxy<WakerEvent>);

impl Waker {
    pub fn new(event_loop: &EventLoop<WakerEvent>) -> Self {
        Self(event_loop.create_proxy())
    }
}

impl embedder_traits::EventLoopWaker for Waker {
    fn clone_box(&self) -> Box<dyn embedder_traits::EventLoopWaker> {
        Box::new(self.clone())
    }

    fn wake(&self) {
        // Échoue seulement si la boucle est déjà fermée (pendant le shutdown).
        if let Err(error) = self.0.send_event(WakerEvent) {
            warn!(?error, "Échec du réveil de la boucle d'événements Winit");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WebViewDelegate : callbacks Servo → coquille
// ─────────────────────────────────────────────────────────────────────────────

/// Titre de fenêtre affiché pour un titre de page donné.
pub fn window_title(app_title: &str, page_title: Option<&str>) -> String {
    match page_title.map(str::trim) {
        Some(title) if !title.is_empty() => format!("{app_title} — {title}"),
        _ => app_title.to_string(),
    }
}

impl WebViewDelegate for ShellState {
    /// Servo a composité un frame : on demande un redraw, qui déclenchera
    /// `RedrawRequested` → `webview.paint()` + `present()`.
    fn notify_new_frame_ready(&self, _webview: WebView) {
        self.window.request_redraw();
    }

    fn notify_page_title_changed(&self, _webview: WebView, title: Option<String>) {
        self.window
            .set_title(&window_title(&self.app_title, title.as_deref()));
    }

    fn notify_url_changed(&self, _webview: WebView, url: Url) {
        info!(%url, "URL changée");
    }

    fn notify_load_status_changed(&self, _webview: WebView, status: LoadStatus) {
        debug!(?status, "Statut de chargement");
    }
}
