//! Erreurs de démarrage de la coquille.
//!
//! Seules les étapes que l'embedder contrôle produisent une erreur : la
//! résolution de l'URL, les ressources Servo, la fenêtre, le contexte GL et
//! l'ordre des appels du cycle de vie. Ce qui échoue à l'intérieur du moteur
//! reste du ressort du moteur.

use std::path::PathBuf;

use winit::raw_window_handle::HandleError;

use crate::lifecycle::{Phase, Step};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("URL invalide '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("argument --{flag} invalide: {reason}")]
    InvalidArgument { flag: String, reason: String },

    #[error(
        "dossier 'resources/' de Servo introuvable (cherché dans : {}). \
         Définissez SERVO_RESOURCES_PATH ou placez le dossier à côté de l'exécutable",
        display_paths(.searched)
    )]
    ResourcesNotFound { searched: Vec<PathBuf> },

    #[error("DisplayHandle indisponible: {0}")]
    DisplayHandle(#[source] HandleError),

    #[error("création de la fenêtre impossible: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("WindowHandle indisponible: {0}")]
    WindowHandle(#[source] HandleError),

    /// `surfman::Error` n'implémente que `Debug` : on garde sa forme texte.
    #[error("contexte de rendu indisponible: {0}")]
    Rendering(String),

    #[error("boucle d'événements: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("étape {step:?} appelée dans la phase {phase:?}")]
    OutOfOrder { step: Step, phase: Phase },

    #[error("le moteur doit tourner sur le thread principal (thread courant : {0})")]
    NotMainThread(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "aucun emplacement".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_not_found_lists_searched_paths() {
        let err = ShellError::ResourcesNotFound {
            searched: vec![PathBuf::from("/a/resources"), PathBuf::from("/b/resources")],
        };
        let msg = err.to_string();
        assert!(msg.contains("/a/resources, /b/resources"), "{msg}");
        assert!(msg.contains("SERVO_RESOURCES_PATH"));
    }

    #[test]
    fn test_resources_not_found_without_candidates() {
        let err = ShellError::ResourcesNotFound { searched: vec![] };
        assert!(err.to_string().contains("aucun emplacement"));
    }

    #[test]
    fn test_out_of_order_names_step_and_phase() {
        let err = ShellError::OutOfOrder {
            step: Step::RunLoop,
            phase: Phase::Uninitialized,
        };
        assert_eq!(
            err.to_string(),
            "étape RunLoop appelée dans la phase Uninitialized"
        );
    }

    #[test]
    fn test_handle_errors_keep_source() {
        use std::error::Error;

        let err = ShellError::DisplayHandle(HandleError::Unavailable);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("DisplayHandle indisponible"));

        let err = ShellError::WindowHandle(HandleError::NotSupported);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_url_keeps_source() {
        let source = url::Url::parse("http://[::1").unwrap_err();
        let err = ShellError::InvalidUrl {
            input: "http://[::1".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("URL invalide 'http://[::1'"));
    }
}
