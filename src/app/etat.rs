//! src/app/etat.rs
//!
//! État de l’app native (sans vue).
//!
//! Rôle : posséder le pilote, parler au serveur hors du fil UI, et recevoir le rendu.
//!
//! Contrats :
//! - Aucune évaluation ici (le serveur calcule).
//! - Le rendu du serveur arrive par un canal : c’est lui, et non un délai, qui termine
//!   une soumission (`Pilote::rendu_termine`).
//! - Historique de session borné, un par type de calculatrice (comme côté serveur).

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use eframe::egui;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::pilote::routes::ROUTE_MODE_ANGLE;
use crate::pilote::{Commande, Effet, Formulaire, Pilote, TypeCalculatrice};
use crate::serveur::{ErreurServeur, Evaluateur, PageRendue};

/// Garde-fou : même borne que l’historique serveur.
pub const HISTORIQUE_MAX: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntreeHistorique {
    pub expression: String,
    pub resultat: String,
}

/// Historiques de session, indexés par type de calculatrice.
#[derive(Clone, Debug, Default)]
pub struct Historiques([Vec<EntreeHistorique>; TypeCalculatrice::TOUS.len()]);

impl Historiques {
    pub fn de(&self, calculatrice: TypeCalculatrice) -> &[EntreeHistorique] {
        &self.0[calculatrice as usize]
    }

    /// Le plus récent d’abord, borné à `HISTORIQUE_MAX`.
    pub fn ajouter(&mut self, calculatrice: TypeCalculatrice, entree: EntreeHistorique) {
        let liste = &mut self.0[calculatrice as usize];
        liste.insert(0, entree);
        liste.truncate(HISTORIQUE_MAX);
    }

    pub fn vider(&mut self, calculatrice: TypeCalculatrice) {
        self.0[calculatrice as usize].clear();
    }
}

/// Réponse du fil réseau.
#[derive(Debug)]
pub enum Reponse {
    Soumission {
        expression: String,
        /// Page d’où le formulaire est parti.
        calculatrice: TypeCalculatrice,
        page: Result<PageRendue, ErreurServeur>,
    },
    Navigation {
        route: &'static str,
        /// Calculatrice affichée avant la commande (retour en cas d’échec).
        precedente: TypeCalculatrice,
        page: Result<PageRendue, ErreurServeur>,
    },
}

pub struct AppPilote {
    // --- saisie + panneaux ---
    pub pilote: Pilote,

    // --- historiques de session ---
    pub historiques: Historiques,

    // --- réseau ---
    pub erreur_reseau: String,
    pub navigation_en_cours: bool,
    evaluateur: Arc<dyn Evaluateur>,
    envoi: Sender<Reponse>,
    reception: Receiver<Reponse>,
}

impl AppPilote {
    pub fn new(config: &Configuration, evaluateur: Arc<dyn Evaluateur>) -> Self {
        let (envoi, reception) = channel();
        let mut pilote = Pilote::new(config.marqueur_erreur.clone());
        pilote.calculatrice = config.calculatrice;
        Self {
            pilote,
            historiques: Historiques::default(),
            erreur_reseau: String::new(),
            navigation_en_cours: false,
            evaluateur,
            envoi,
            reception,
        }
    }

    /// Première page : comme un chargement dans le navigateur.
    pub fn demarrer(&mut self, ctx: Option<egui::Context>) {
        let calculatrice = self.pilote.calculatrice;
        self.lancer_navigation(calculatrice.route(), calculatrice, ctx);
    }

    /// Historique de la calculatrice affichée.
    pub fn historique(&self) -> &[EntreeHistorique] {
        self.historiques.de(self.pilote.calculatrice)
    }

    /* ------------------------ Commandes ------------------------ */

    pub fn commande(&mut self, commande: Commande, ctx: Option<egui::Context>) {
        if self.navigation_en_cours {
            // La page est en train de partir : on ignore.
            return;
        }
        let precedente = self.pilote.calculatrice;
        match self.pilote.appliquer(commande) {
            Effet::Aucun => {}
            Effet::Soumettre(f) => self.lancer_soumission(f, ctx),
            Effet::Naviguer(route) => self.lancer_navigation(route, precedente, ctx),
        }
    }

    fn lancer_soumission(&mut self, formulaire: Formulaire, ctx: Option<egui::Context>) {
        self.erreur_reseau.clear();
        let evaluateur = Arc::clone(&self.evaluateur);
        let envoi = self.envoi.clone();
        let calculatrice = self.pilote.calculatrice;
        thread::spawn(move || {
            let page = evaluateur.soumettre(&formulaire, calculatrice);
            let _ = envoi.send(Reponse::Soumission {
                expression: formulaire.expression,
                calculatrice,
                page,
            });
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    fn lancer_navigation(
        &mut self,
        route: &'static str,
        precedente: TypeCalculatrice,
        ctx: Option<egui::Context>,
    ) {
        self.erreur_reseau.clear();
        self.navigation_en_cours = true;
        let evaluateur = Arc::clone(&self.evaluateur);
        let envoi = self.envoi.clone();
        thread::spawn(move || {
            let page = evaluateur.naviguer(route);
            let _ = envoi.send(Reponse::Navigation {
                route,
                precedente,
                page,
            });
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    /* ------------------------ Réponses ------------------------ */

    /// À appeler à chaque frame : applique les rendus arrivés.
    pub fn recevoir(&mut self) {
        while let Ok(reponse) = self.reception.try_recv() {
            self.appliquer_reponse(reponse);
        }
    }

    /// Version bloquante (tests) : attend une réponse.
    #[cfg(test)]
    pub fn attendre_reponse(&mut self) {
        if let Ok(reponse) = self.reception.recv() {
            self.appliquer_reponse(reponse);
        }
    }

    fn appliquer_reponse(&mut self, reponse: Reponse) {
        match reponse {
            Reponse::Soumission {
                calculatrice,
                expression,
                ..
            } if calculatrice != self.pilote.calculatrice => {
                debug!(%expression, ?calculatrice, "rendu d’une autre page, ignoré");
            }
            Reponse::Soumission {
                expression,
                calculatrice,
                page,
            } => match page {
                Ok(page) => {
                    self.pilote.rendu_termine(&page.valeur_champ);
                    if self.pilote.saisie.resultat_affiche() {
                        self.ajouter_historique(calculatrice, expression, page.valeur_champ);
                    }
                }
                Err(e) => {
                    warn!(%e, "soumission échouée");
                    self.pilote.saisie.soumission_echouee();
                    self.erreur_reseau = e.to_string();
                }
            },
            Reponse::Navigation {
                route,
                precedente,
                page,
            } => {
                self.navigation_en_cours = false;
                match page {
                    Ok(page) => {
                        if let Some(t) = TypeCalculatrice::TOUS
                            .into_iter()
                            .find(|t| t.route_effacer_historique() == route)
                        {
                            self.historiques.vider(t);
                        }
                        self.pilote.charger(&page.valeur_champ);
                    }
                    Err(e) => {
                        warn!(%e, route, "navigation échouée");
                        // Le serveur n’a pas suivi : on annule les indicateurs optimistes.
                        if route == ROUTE_MODE_ANGLE {
                            self.pilote.mode_angle = self.pilote.mode_angle.basculer();
                        }
                        self.pilote.calculatrice = precedente;
                        self.erreur_reseau = e.to_string();
                    }
                }
            }
        }
    }

    fn ajouter_historique(
        &mut self,
        calculatrice: TypeCalculatrice,
        expression: String,
        resultat: String,
    ) {
        debug!(%expression, %resultat, ?calculatrice, "historique");
        self.historiques.ajouter(
            calculatrice,
            EntreeHistorique {
                expression,
                resultat,
            },
        );
    }
}
