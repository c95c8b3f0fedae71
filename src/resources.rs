//! Lecteur de ressources Servo.
//!
//! Servo a besoin d'un ensemble de fichiers de ressources (préférences,
//! certificats, listes de domaines publics, etc.) pour fonctionner.
//! L'embedder doit fournir une implémentation de `ResourceReaderMethods` et
//! l'enregistrer via `servo::resources::set()` avant de construire le moteur.
//!
//! Le dossier `resources/` est cherché dans cet ordre :
//! 1. Variable d'environnement `SERVO_RESOURCES_PATH`
//! 2. À côté de l'exécutable (`<exe_dir>/resources/`), ou à la racine du
//!    projet si l'exécutable est dans `target/<profil>/`
//! 3. Dans le répertoire courant (`./resources/`)

use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

use servo::resources::{self, Resource};
use tracing::{error, info};

use crate::error::{Result, ShellError};

/// Résout le dossier de ressources et enregistre le lecteur auprès de Servo.
///
/// **Doit être appelé avant `ServoBuilder::build()`**, sinon Servo
/// paniquera avec "Resource reader not set".
pub fn init() -> Result<PathBuf> {
    let candidates = candidate_dirs(
        env::var_os("SERVO_RESOURCES_PATH").map(PathBuf::from),
        env::current_exe().ok(),
        env::current_dir().ok(),
    );
    let dir = locate_resources_dir(&candidates)?;
    info!(path = %dir.display(), "Ressources Servo trouvées");

    resources::set(Box::new(ResourceReader { dir: dir.clone() }));
    Ok(dir)
}

struct ResourceReader {
    dir: PathBuf,
}

impl resources::ResourceReaderMethods for ResourceReader {
    fn read(&self, file: Resource) -> Vec<u8> {
        // Le trait n'offre pas de canal d'erreur : une ressource manquante
        // rend le moteur inutilisable.
        confined_path(&self.dir, file.filename())
            .and_then(fs::read)
            .unwrap_or_else(|e| {
                error!(resource = file.filename(), error = %e, "Ressource Servo illisible");
                panic!(
                    "Impossible de lire la ressource Servo {:?} dans {}: {}",
                    file.filename(),
                    self.dir.display(),
                    e
                )
            })
    }

    fn sandbox_access_files_dirs(&self) -> Vec<PathBuf> {
        vec![self.dir.clone()]
    }

    fn sandbox_access_files(&self) -> Vec<PathBuf> {
        vec![]
    }
}

/// Construit la liste ordonnée des dossiers candidats.
fn candidate_dirs(
    env_override: Option<PathBuf>,
    exe_path: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_override {
        candidates.push(path);
    }

    if let Some(exe) = exe_path {
        let exe = exe.canonicalize().unwrap_or(exe);
        if let Some(exe_dir) = exe.parent() {
            candidates.push(exe_dir.join("resources"));

            // Pendant le développement avec cargo : target/{debug,release}/bws
            if let Some(target_dir) = exe_dir.parent()
                && target_dir.file_name().is_some_and(|n| n == "target")
                && let Some(project_root) = target_dir.parent()
            {
                candidates.push(project_root.join("resources"));
            }
        }
    }

    if let Some(cwd) = cwd {
        candidates.push(cwd.join("resources"));
    }

    candidates
}

/// Premier candidat qui est un dossier existant.
fn locate_resources_dir(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|p| p.is_dir())
        .cloned()
        .ok_or_else(|| ShellError::ResourcesNotFound {
            searched: candidates.to_vec(),
        })
}

/// Chemin canonique de `filename` dans `dir`, refusé s'il en sort
/// (liens symboliques ou `..`).
fn confined_path(dir: &Path, filename: &str) -> io::Result<PathBuf> {
    let root = dir.canonicalize()?;
    let canonical = root.join(filename).canonicalize()?;

    if !canonical.starts_with(&root) {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!(
                "chemin hors du dossier de ressources: {}",
                canonical.display()
            ),
        ));
    }
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_comes_first() {
        let candidates = candidate_dirs(
            Some(PathBuf::from("/opt/servo/resources")),
            None,
            Some(PathBuf::from("/work")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/opt/servo/resources"),
                PathBuf::from("/work/resources"),
            ]
        );
    }

    #[test]
    fn test_cargo_target_dir_adds_project_root() {
        let candidates = candidate_dirs(
            None,
            Some(PathBuf::from("/nonexistent/proj/target/debug/bws")),
            None,
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/nonexistent/proj/target/debug/resources"),
                PathBuf::from("/nonexistent/proj/resources"),
            ]
        );
    }

    #[test]
    fn test_installed_exe_has_single_candidate() {
        let candidates = candidate_dirs(None, Some(PathBuf::from("/nonexistent/bin/bws")), None);
        assert_eq!(candidates, vec![PathBuf::from("/nonexistent/bin/resources")]);
    }

    #[test]
    fn test_locate_skips_missing_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");
        let plain_file = tmp.path().join("file");
        fs::write(&plain_file, b"x").unwrap();
        let real = tmp.path().join("resources");
        fs::create_dir(&real).unwrap();

        let found = locate_resources_dir(&[missing, plain_file, real.clone()]).unwrap();
        assert_eq!(found, real);
    }

    #[test]
    fn test_locate_reports_all_searched_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");

        let err = locate_resources_dir(&[a.clone(), b.clone()]).unwrap_err();
        match err {
            ShellError::ResourcesNotFound { searched } => assert_eq!(searched, vec![a, b]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_confined_path_reads_inside_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("prefs.json"), b"{}").unwrap();

        let path = confined_path(tmp.path(), "prefs.json").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"{}");
    }

    #[test]
    fn test_confined_path_rejects_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let resources = tmp.path().join("resources");
        fs::create_dir(&resources).unwrap();
        fs::write(tmp.path().join("secret.txt"), b"nope").unwrap();

        let err = confined_path(&resources, "../secret.txt").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_confined_path_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = confined_path(tmp.path(), "absent.json").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
