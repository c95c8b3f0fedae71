//! Étapes de la coquille, indépendantes de Winit et de Servo.
//!
//! [`Session`] porte la transition `Initial → Running → Stopped`, le
//! [`Lifecycle`] et l'erreur de démarrage. Le démontage passe par le trait
//! [`Teardown`] : d'abord fermer le navigateur, ensuite libérer le moteur.

use tracing::{error, warn};

use crate::error::{Result, ShellError};
use crate::lifecycle::{Lifecycle, Phase, Step};

/// Démontage en deux temps d'un navigateur actif.
pub trait Teardown {
    /// Ferme le navigateur (la webview) et laisse le moteur traiter la fermeture.
    fn close_browser(&self);

    /// Libère le moteur. Appelé après [`Teardown::close_browser`].
    fn release_engine(self);
}

enum Stage<P, R> {
    Initial(P),
    Running(R),
    Stopped,
}

pub struct Session<P, R: Teardown> {
    stage: Stage<P, R>,
    lifecycle: Lifecycle,
    startup_error: Option<ShellError>,
}

impl<P, R: Teardown> Session<P, R> {
    pub fn new(pending: P) -> Self {
        Self {
            stage: Stage::Initial(pending),
            lifecycle: Lifecycle::new(),
            startup_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    pub fn advance(&mut self, step: Step) -> Result<Phase> {
        self.lifecycle.advance(step)
    }

    /// Les paramètres de démarrage, tant que rien n'a démarré.
    pub fn pending(&self) -> Option<&P> {
        match &self.stage {
            Stage::Initial(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn running(&self) -> Option<&R> {
        match &self.stage {
            Stage::Running(running) => Some(running),
            _ => None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.stage, Stage::Stopped)
    }

    pub fn enter_running(&mut self, running: R) {
        self.stage = Stage::Running(running);
    }

    /// Enregistre une erreur de démarrage puis démonte. La première erreur
    /// est conservée.
    pub fn fail(&mut self, e: ShellError) {
        error!(error = %e, "Échec du démarrage");
        if self.startup_error.is_none() {
            self.startup_error = Some(e);
        }
        self.shutdown();
    }

    /// Shutdown. Un second appel ne fait rien.
    pub fn shutdown(&mut self) {
        let stage = std::mem::replace(&mut self.stage, Stage::Stopped);

        if let Stage::Running(running) = stage {
            running.close_browser();
            running.release_engine();
        }

        if self.lifecycle.phase() != Phase::Uninitialized
            && let Err(e) = self.lifecycle.advance(Step::Shutdown)
        {
            warn!(error = %e, "Shutdown hors séquence");
        }
    }

    /// Résultat final : l'erreur de démarrage, s'il y en a eu une.
    pub fn into_result(self) -> Result<()> {
        match self.startup_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct FakeBrowser(Log);

    impl Teardown for FakeBrowser {
        fn close_browser(&self) {
            self.0.borrow_mut().push("close_browser");
        }

        fn release_engine(self) {
            self.0.borrow_mut().push("release_engine");
        }
    }

    fn running_session(log: &Log) -> Session<(), FakeBrowser> {
        let mut session = Session::new(());
        session.advance(Step::Initialize).unwrap();
        session.advance(Step::CreateWindow).unwrap();
        session.advance(Step::RunLoop).unwrap();
        session.enter_running(FakeBrowser(log.clone()));
        session
    }

    #[test]
    fn test_shutdown_closes_browser_before_engine() {
        let log = Log::default();
        let mut session = running_session(&log);

        session.shutdown();

        assert_eq!(*log.borrow(), vec!["close_browser", "release_engine"]);
        assert_eq!(session.phase(), Phase::ShutDown);
        assert!(session.is_stopped());
        assert!(session.into_result().is_ok());
    }

    #[test]
    fn test_second_shutdown_does_nothing() {
        let log = Log::default();
        let mut session = running_session(&log);

        session.shutdown();
        session.shutdown();

        assert_eq!(log.borrow().len(), 2);
        assert_eq!(session.phase(), Phase::ShutDown);
    }

    #[test]
    fn test_failure_after_engine_init_shuts_down() {
        let mut session: Session<&str, FakeBrowser> = Session::new("pending");
        session.advance(Step::Initialize).unwrap();

        session.fail(ShellError::Rendering("pas de GL".to_string()));

        assert!(session.is_stopped());
        assert!(session.pending().is_none());
        assert_eq!(session.phase(), Phase::ShutDown);
        assert!(matches!(
            session.into_result(),
            Err(ShellError::Rendering(ref m)) if m == "pas de GL"
        ));
    }

    #[test]
    fn test_failure_before_engine_init_keeps_phase() {
        let mut session: Session<(), FakeBrowser> = Session::new(());

        session.fail(ShellError::NotMainThread("worker".to_string()));

        assert!(session.is_stopped());
        assert_eq!(session.phase(), Phase::Uninitialized);
        assert!(session.into_result().is_err());
    }

    #[test]
    fn test_first_startup_error_is_kept() {
        let mut session: Session<(), FakeBrowser> = Session::new(());
        session.fail(ShellError::NotMainThread("a".to_string()));
        session.fail(ShellError::NotMainThread("b".to_string()));

        assert!(matches!(
            session.into_result(),
            Err(ShellError::NotMainThread(ref n)) if n == "a"
        ));
    }

    #[test]
    fn test_running_and_pending_accessors() {
        let log = Log::default();
        let mut session: Session<u8, FakeBrowser> = Session::new(7);
        assert_eq!(session.pending(), Some(&7));
        assert!(session.running().is_none());

        session.enter_running(FakeBrowser(log));
        assert!(session.pending().is_none());
        assert!(session.running().is_some());
    }
}
