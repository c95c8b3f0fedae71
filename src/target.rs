//! Résolution de l'adresse à ouvrir.
//!
//! L'URL vient de la configuration, éventuellement remplacée par la ligne de
//! commande (voir [`crate::cli`]). Une saisie sans schéma reçoit `https://`.

use url::Url;

use crate::config::Config;
use crate::error::{Result, ShellError};

/// L'URL cible de la configuration (déjà fusionnée avec la ligne de commande).
pub fn resolve_target(config: &Config) -> Result<Url> {
    parse_url(&config.general.url)
}

/// Parse une saisie utilisateur en URL, en ajoutant `https://` si besoin.
pub fn parse_url(input: &str) -> Result<Url> {
    let input = input.trim();

    // Essaie de parser directement (fonctionne si le schéma est présent)
    if let Ok(url) = Url::parse(input)
        && !is_host_and_port(&url)
    {
        return Ok(url);
    }

    // Sinon, ajoute https:// et réessaie
    Url::parse(&format!("https://{input}")).map_err(|source| ShellError::InvalidUrl {
        input: input.to_string(),
        source,
    })
}

/// `localhost:8000` se parse comme un schéma `localhost` suivi du chemin
/// `8000` : un chemin opaque qui commence par un port est un hôte sans schéma.
fn is_host_and_port(url: &Url) -> bool {
    if !url.cannot_be_a_base() {
        return false;
    }
    let port = url.path().split('/').next().unwrap_or("");
    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
}
