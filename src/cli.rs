//! Arguments de ligne de commande.
//!
//! ```text
//! bws [URL] [--url URL] [--width N] [--height N]
//! ```
//!
//! `--url` l'emporte sur l'argument positionnel ; les deux remplacent
//! l'URL de la configuration. `--width`/`--height` remplacent la taille de
//! la fenêtre. Les flags acceptent aussi la forme `--flag=valeur` ; les
//! flags inconnus sont ignorés.

use crate::config::Config;
use crate::error::{Result, ShellError};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl CliArgs {
    /// Parse les arguments (sans le nom du binaire).
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = CliArgs::default();
        let mut positional = None;
        let mut args = args.into_iter().map(|a| a.as_ref().to_string());

        while let Some(arg) = args.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                positional.get_or_insert(arg);
                continue;
            };

            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (flag, None),
            };
            if !matches!(name, "url" | "width" | "height") {
                continue;
            }

            let value = match inline {
                Some(v) => v,
                None => args.next().ok_or_else(|| ShellError::InvalidArgument {
                    flag: name.to_string(),
                    reason: "valeur manquante".to_string(),
                })?,
            };

            match name {
                "url" => parsed.url = Some(value),
                "width" => parsed.width = Some(parse_dimension(name, &value)?),
                _ => parsed.height = Some(parse_dimension(name, &value)?),
            }
        }

        if parsed.url.is_none() {
            parsed.url = positional;
        }
        Ok(parsed)
    }

    /// Fusionne les arguments dans la configuration chargée.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.general.url = url.clone();
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}

fn parse_dimension(flag: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ShellError::InvalidArgument {
            flag: flag.to_string(),
            reason: format!("'{value}' n'est pas une taille en pixels"),
        }),
    }
}
