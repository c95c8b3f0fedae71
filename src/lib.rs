//! # bws — coquille navigateur mono-fenêtre
//!
//! Ouvre une seule fenêtre sur une adresse donnée via le moteur Servo, fait
//! tourner la boucle d'événements, puis libère le moteur à la fermeture.
//!
//! ## Modules
//!
//! - [`shell`] : boucle d'événements Winit et cycle de vie de la fenêtre
//!   (pattern "Two-Phase App" de winit 0.30).
//! - [`lifecycle`] : ordre Initialize → CreateWindow → RunLoop → Shutdown.
//! - [`session`] : transitions Initial → Running → Stopped et démontage.
//! - [`servo_glue`] : `Waker` entre les threads Servo et le thread principal,
//!   et le `WebViewDelegate` de la coquille.
//! - [`rendering`] : création du contexte GL de la fenêtre.
//! - [`preferences`] : `servo::Preferences` dérivées de la configuration.
//! - [`resources`] : lecteur du dossier `resources/` de Servo.
//! - [`config`] : fichier `config.toml`.
//! - [`cli`] : `[URL]`, `--url`, `--width`, `--height`.
//! - [`target`] : choix de l'URL à ouvrir.
//! - [`error`] : erreurs de démarrage.

pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod preferences;
pub mod rendering;
pub mod resources;
pub mod servo_glue;
pub mod session;
pub mod shell;
pub mod target;
