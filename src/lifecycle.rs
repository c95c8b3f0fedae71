//! Séquence de vie de la coquille.
//!
//! Le moteur impose un ordre d'appel strict :
//!
//! ```text
//! Initialize ─► CreateWindow ─► RunLoop ─► Shutdown
//! ```
//!
//! [`Lifecycle`] garde la phase courante et refuse toute étape appelée hors
//! de cet ordre. `Shutdown` est accepté dès que le moteur existe, même si la
//! fenêtre n'a jamais été ouverte, pour que le moteur soit toujours libéré.

use std::thread;

use tracing::{debug, info};

use crate::error::{Result, ShellError};

/// Phase dans laquelle se trouve la coquille.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    EngineReady,
    WindowOpen,
    Running,
    ShutDown,
}

/// Les quatre appels du cycle de vie, dans l'ordre exigé par le moteur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Initialize,
    CreateWindow,
    RunLoop,
    Shutdown,
}

#[derive(Debug)]
pub struct Lifecycle {
    phase: Phase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Applique une étape. Retourne la nouvelle phase, ou
    /// [`ShellError::OutOfOrder`] si l'étape n'est pas permise ici.
    pub fn advance(&mut self, step: Step) -> Result<Phase> {
        let next = match (self.phase, step) {
            (Phase::Uninitialized, Step::Initialize) => Phase::EngineReady,
            (Phase::EngineReady, Step::CreateWindow) => Phase::WindowOpen,
            (Phase::WindowOpen, Step::RunLoop) => Phase::Running,
            (Phase::EngineReady | Phase::WindowOpen | Phase::Running, Step::Shutdown) => {
                Phase::ShutDown
            }
            (Phase::ShutDown, Step::Shutdown) => {
                debug!("Shutdown déjà effectué, ignoré");
                return Ok(Phase::ShutDown);
            }
            (phase, step) => return Err(ShellError::OutOfOrder { step, phase }),
        };

        info!(?step, from = ?self.phase, to = ?next, "Étape du cycle de vie");
        self.phase = next;
        Ok(next)
    }

    pub fn is_shut_down(&self) -> bool {
        self.phase == Phase::ShutDown
    }
}

/// Vérifie que l'appelant tourne sur le thread principal du processus.
///
/// Winit et le contexte GL de Servo sont liés au thread qui les crée ; tout
/// le cycle de vie doit donc rester sur le thread principal.
pub fn ensure_ui_thread() -> Result<()> {
    check_thread_name(thread::current().name())
}

fn check_thread_name(name: Option<&str>) -> Result<()> {
    match name {
        Some("main") => Ok(()),
        other => Err(ShellError::NotMainThread(
            other.unwrap_or("<anonyme>").to_string(),
        )),
    }
}
