// src/app.rs
//
// Calculatrice pilote : module App (natif)
// ----------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppPilote (pour main.rs: use crate::app::AppPilote;)
// - Fournir l’impl eframe::App
//
// Important:
// - Le clavier est lu dans vue.rs (une seule fois par frame, pas de double déclenchement).

pub mod etat;
pub mod vue;

pub use etat::AppPilote;

use eframe::egui;

impl eframe::App for AppPilote {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}
