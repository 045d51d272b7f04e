// src/config.rs
//
// Configuration native : fichier TOML optionnel + variables d’environnement.
//
// Ordre : défauts -> ~/.config/calculatrice_pilote.toml -> CALC_SERVEUR / CALC_MARQUEUR_ERREUR

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::pilote::saisie::MARQUEUR_ERREUR_DEFAUT;
use crate::pilote::TypeCalculatrice;

const NOM_FICHIER: &str = "calculatrice_pilote.toml";

#[derive(Debug, Error)]
pub enum ErreurConfig {
    #[error("lecture de {chemin}: {source}")]
    Lecture {
        chemin: PathBuf,
        source: std::io::Error,
    },
    #[error("format de {chemin}: {source}")]
    Format {
        chemin: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Configuration {
    /// Racine du serveur d’évaluation (sans la route).
    pub url_serveur: String,
    /// Sous-chaîne qui distingue un message d’erreur d’un résultat.
    pub marqueur_erreur: String,
    pub delai_requete_s: u64,
    /// Calculatrice ouverte au démarrage.
    pub calculatrice: TypeCalculatrice,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            url_serveur: "http://127.0.0.1:5000".to_string(),
            marqueur_erreur: MARQUEUR_ERREUR_DEFAUT.to_string(),
            delai_requete_s: 10,
            calculatrice: TypeCalculatrice::Standard,
        }
    }
}

impl Configuration {
    /// Charge la configuration complète (fichier s’il existe, puis environnement).
    pub fn charger() -> Result<Self, ErreurConfig> {
        let mut config = match dirs::config_dir().map(|d| d.join(NOM_FICHIER)) {
            Some(chemin) if chemin.exists() => Self::depuis_fichier(&chemin)?,
            _ => Self::default(),
        };
        config.appliquer_env(|cle| std::env::var(cle).ok());
        info!(serveur = %config.url_serveur, "configuration chargée");
        Ok(config)
    }

    pub fn depuis_fichier(chemin: &Path) -> Result<Self, ErreurConfig> {
        let texte = std::fs::read_to_string(chemin).map_err(|source| ErreurConfig::Lecture {
            chemin: chemin.to_path_buf(),
            source,
        })?;
        debug!(chemin = %chemin.display(), "fichier de configuration");
        Self::depuis_toml(&texte).map_err(|source| ErreurConfig::Format {
            chemin: chemin.to_path_buf(),
            source,
        })
    }

    pub fn depuis_toml(texte: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(texte)
    }

    /// Surcharges d’environnement (lecteur injecté pour les tests).
    pub fn appliquer_env(&mut self, lire: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lire("CALC_SERVEUR").filter(|u| !u.trim().is_empty()) {
            self.url_serveur = url.trim().to_string();
        }
        if let Some(m) = lire("CALC_MARQUEUR_ERREUR").filter(|m| !m.is_empty()) {
            self.marqueur_erreur = m;
        }
        // Garde-fou : un marqueur vide ferait de tout texte une erreur.
        if self.marqueur_erreur.is_empty() {
            self.marqueur_erreur = MARQUEUR_ERREUR_DEFAUT.to_string();
        }
    }

    pub fn delai_requete(&self) -> Duration {
        Duration::from_secs(self.delai_requete_s.max(1))
    }
}
