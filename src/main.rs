// src/main.rs
//
// Calculatrice pilote : point d’entrée NATIF + WEB (WASM)
// -------------------------------------------------------
// But:
// - NATIF (Linux/Windows/macOS) : fenêtre eframe, formulaire posté au serveur par HTTP
// - WEB  (wasm32)              : liaison au DOM de la page rendue par le serveur
// - Le pilote (saisie, curseur, panneaux) est le même des deux côtés
//
// Côté WEB (WASM) : la page doit contenir le champ d’affichage et son formulaire :
//   <form method="post"><input id="display" name="expression"></form>

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

mod pilote;

#[cfg(not(target_arch = "wasm32"))]
mod app;
#[cfg(not(target_arch = "wasm32"))]
mod config;
#[cfg(not(target_arch = "wasm32"))]
mod serveur;

#[cfg(target_arch = "wasm32")]
mod web;

/// Titre unique (natif + web).
#[cfg(not(target_arch = "wasm32"))]
const TITRE_APP: &str = "Calculatrice pilote";

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use std::sync::Arc;

    use eframe::egui;
    use tracing_subscriber::EnvFilter;

    use app::AppPilote;
    use config::Configuration;
    use serveur::{Evaluateur, ServeurHttp};

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Configuration::charger().unwrap_or_else(|e| {
        tracing::warn!(%e, "configuration ignorée, valeurs par défaut");
        Configuration::default()
    });

    let evaluateur: Arc<dyn Evaluateur> = match ServeurHttp::new(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!(%e, "client HTTP indisponible");
            return Err(eframe::Error::AppCreation(Box::new(e)));
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([520.0, 560.0])
            .with_min_inner_size([420.0, 460.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |cc| {
            let mut app = AppPilote::new(&config, evaluateur);
            // Contexte egui prêt => première page demandée au serveur.
            app.demarrer(Some(cc.egui_ctx.clone()));
            Ok(Box::new(app))
        }),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `web::start()` (wasm_bindgen).
}
