// src/app/vue.rs
//
// Vue (UI egui), natif
// --------------------
// Objectifs :
// - L’affichage n’est PAS un TextEdit : seul le pilote modifie le texte (liste blanche).
// - Clavier : événements egui traduits en noms DOM, puis `pilote::interpreter`.
// - Menu déroulant + panneau d’historique : fermés sur clic extérieur.
//
// Note :
// - Le curseur se déplace au clavier (flèches, Home/End) ; pas de placement à la souris ici.

use eframe::egui;

use super::etat::AppPilote;
use crate::pilote::{interpreter, Cible, Commande, Direction, Modificateurs, TypeCalculatrice};

/// Caret dessiné dans l’affichage.
const CARET: char = '│';

/// Zones cliquables de la frame courante (test “clic dehors”).
#[derive(Default)]
struct Zones {
    menu: Option<egui::Rect>,
    historique: Option<egui::Rect>,
    bouton_historique: Option<egui::Rect>,
}

impl Zones {
    fn cible(&self, pos: egui::Pos2) -> Cible {
        let dans = |r: Option<egui::Rect>| r.is_some_and(|r| r.contains(pos));
        Cible {
            dans_menu: dans(self.menu),
            dans_historique: dans(self.historique),
            sur_bouton_historique: dans(self.bouton_historique),
        }
    }
}

impl AppPilote {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.recevoir();

        let mut zones = Zones::default();

        if self.pilote.panneaux.historique.est_ouvert() {
            let resp = egui::SidePanel::right("panneau_historique")
                .resizable(false)
                .default_width(220.0)
                .show(ctx, |ui| self.ui_historique(ui));
            zones.historique = Some(resp.response.rect);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

            self.ui_barre(ui, &mut zones);
            ui.add_space(8.0);
            self.ui_affichage(ui);
            ui.add_space(8.0);
            self.ui_pave(ui);

            if !self.erreur_reseau.is_empty() {
                ui.add_space(6.0);
                ui.colored_label(ui.visuals().error_fg_color, &self.erreur_reseau);
            }
        });

        self.clavier(ctx);

        // Clic dehors : après les widgets (un bouton de bascule a déjà agi).
        let clic = ctx.input(|i| {
            if i.pointer.primary_clicked() {
                i.pointer.interact_pos()
            } else {
                None
            }
        });
        if let Some(pos) = clic {
            self.commande(Commande::ClicDocument(zones.cible(pos)), Some(ctx.clone()));
        }
    }

    fn ui_barre(&mut self, ui: &mut egui::Ui, zones: &mut Zones) {
        let ctx = ui.ctx().clone();

        ui.horizontal(|ui| {
            let menu = ui.button(format!("☰ {}", self.pilote.calculatrice.nom()));
            if menu.clicked() {
                self.commande(Commande::BasculerMenu, Some(ctx.clone()));
            }
            zones.menu = Some(menu.rect);

            if self.pilote.calculatrice.a_mode_angle() {
                let mode = self.pilote.mode_angle.etiquette();
                if ui
                    .button(mode)
                    .on_hover_text("Bascule radians / degrés (serveur)")
                    .clicked()
                {
                    self.commande(Commande::BasculerModeAngle, Some(ctx.clone()));
                }
            }

            let hist = ui.button("Historique");
            if hist.clicked() {
                self.commande(Commande::BasculerHistorique, Some(ctx.clone()));
            }
            zones.bouton_historique = Some(hist.rect);

            if self.pilote.saisie.en_attente() || self.navigation_en_cours {
                ui.spinner();
            }
        });

        if self.pilote.panneaux.menu.est_ouvert() {
            let resp = egui::Frame::group(ui.style()).show(ui, |ui| {
                for t in TypeCalculatrice::TOUS {
                    let actif = t == self.pilote.calculatrice;
                    if ui.selectable_label(actif, t.nom()).clicked() && !actif {
                        self.commande(Commande::ChangerCalculatrice(t), Some(ctx.clone()));
                    }
                }
            });
            // Le conteneur du menu englobe son bouton.
            zones.menu = zones.menu.map(|r| r.union(resp.response.rect));
        }
    }

    fn ui_affichage(&mut self, ui: &mut egui::Ui) {
        let saisie = &self.pilote.saisie;
        let mut texte: String = saisie.valeur().chars().take(saisie.curseur()).collect();
        texte.push(CARET);
        texte.extend(saisie.valeur().chars().skip(saisie.curseur()));

        let mut rich = egui::RichText::new(texte).monospace().size(22.0);
        if saisie.resultat_affiche() {
            rich = rich.strong();
        }

        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(rich);
            });
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();

        ui.horizontal_wrapped(|ui| {
            for (label, jeton) in [
                ("sin", "sin("),
                ("cos", "cos("),
                ("tan", "tan("),
                ("log", "log("),
                ("ln", "ln("),
                ("exp", "exp("),
                ("√", "sqrt("),
                ("π", "pi"),
                ("i", "i"),
            ] {
                self.bouton_jeton(ui, label, jeton, &ctx);
            }
        });

        ui.add_space(6.0);

        egui::Grid::new("pave_principal")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in [
                    ["7", "8", "9", "(", ")"],
                    ["4", "5", "6", "×", "÷"],
                    ["1", "2", "3", "+", "-"],
                    ["0", ".", "xʸ", "", ""],
                ] {
                    for label in rangee {
                        match label {
                            "" => {
                                ui.label("");
                            }
                            // Le serveur évalue `*`, `/` et `**`.
                            "×" => self.bouton_jeton(ui, label, "*", &ctx),
                            "÷" => self.bouton_jeton(ui, label, "/", &ctx),
                            "xʸ" => self.bouton_jeton(ui, label, "**", &ctx),
                            _ => self.bouton_jeton(ui, label, label, &ctx),
                        }
                    }
                    ui.end_row();
                }
            });

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            self.bouton_commande(ui, "C", Commande::Effacer, &ctx);
            self.bouton_commande(ui, "⌫", Commande::EffacerArriere, &ctx);
            self.bouton_commande(ui, "◀", Commande::Curseur(Direction::Gauche), &ctx);
            self.bouton_commande(ui, "▶", Commande::Curseur(Direction::Droite), &ctx);
            ui.add_space(10.0);
            self.bouton_commande(ui, "=", Commande::Soumettre, &ctx);
        });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();

        ui.horizontal(|ui| {
            ui.heading("Historique");
            if ui.small_button("✕").clicked() {
                self.commande(Commande::FermerHistorique, Some(ctx.clone()));
            }
        });
        ui.separator();

        if self.historique().is_empty() {
            ui.label("(vide)");
        }

        // Copie : un clic modifie `self` pendant l’itération.
        let entrees = self.historique().to_vec();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for e in &entrees {
                ui.horizontal_wrapped(|ui| {
                    if ui.link(&e.expression).clicked() {
                        self.commande(
                            Commande::UtiliserHistorique {
                                valeur: e.expression.clone(),
                                est_expression: true,
                                expression_originale: None,
                            },
                            Some(ctx.clone()),
                        );
                    }
                    ui.label("=");
                    if ui.link(&e.resultat).clicked() {
                        self.commande(
                            Commande::UtiliserHistorique {
                                valeur: e.resultat.clone(),
                                est_expression: false,
                                expression_originale: Some(e.expression.clone()),
                            },
                            Some(ctx.clone()),
                        );
                    }
                });
            }
        });

        ui.separator();
        if ui.button("Effacer l’historique").clicked() {
            self.commande(Commande::EffacerHistorique, Some(ctx));
        }
    }

    fn bouton_jeton(&mut self, ui: &mut egui::Ui, label: &str, jeton: &str, ctx: &egui::Context) {
        if ui.add_sized([46.0, 30.0], egui::Button::new(label)).clicked() {
            self.commande(Commande::Jeton(jeton.to_string()), Some(ctx.clone()));
        }
    }

    fn bouton_commande(
        &mut self,
        ui: &mut egui::Ui,
        label: &str,
        commande: Commande,
        ctx: &egui::Context,
    ) {
        if ui.add_sized([46.0, 30.0], egui::Button::new(label)).clicked() {
            self.commande(commande, Some(ctx.clone()));
        }
    }

    /// Clavier : texte tapé + touches de contrôle, quand aucun autre widget n’a le focus.
    fn clavier(&mut self, ctx: &egui::Context) {
        let champ_focus = ctx.memory(|m| m.focused().is_none());
        let (evenements, mods) = ctx.input(|i| (i.events.clone(), i.modifiers));
        let modificateurs = Modificateurs {
            ctrl: mods.ctrl,
            meta: mods.mac_cmd,
            alt: mods.alt,
        };

        for ev in evenements {
            let cles: Vec<String> = match ev {
                egui::Event::Text(t) => t.chars().map(String::from).collect(),
                egui::Event::Key {
                    key, pressed: true, ..
                } => nom_dom(key).map(str::to_string).into_iter().collect(),
                _ => continue,
            };
            for cle in cles {
                if let Some(c) = interpreter(&cle, modificateurs, champ_focus).commande {
                    self.commande(c, Some(ctx.clone()));
                }
            }
        }
    }
}

/// Touches non imprimables egui -> `KeyboardEvent.key`.
fn nom_dom(key: egui::Key) -> Option<&'static str> {
    use egui::Key;
    let nom = match key {
        Key::Enter => "Enter",
        Key::Escape => "Escape",
        Key::Backspace => "Backspace",
        Key::Delete => "Delete",
        Key::Home => "Home",
        Key::End => "End",
        Key::ArrowLeft => "ArrowLeft",
        Key::ArrowRight => "ArrowRight",
        _ => return None,
    };
    Some(nom)
}
