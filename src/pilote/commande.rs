//! src/pilote/commande.rs
//!
//! Commandes : toute intention de l’UI passe par `Pilote::appliquer`.
//!
//! La vue (egui ou DOM) traduit ses événements en `Commande`, puis exécute l’`Effet`
//! retourné (soumettre le formulaire, naviguer). Le pilote ne touche jamais au DOM.

use tracing::{debug, info};

use super::panneaux::{Cible, Panneaux};
use super::routes::{ModeAngle, TypeCalculatrice, ROUTE_MODE_ANGLE};
use super::saisie::{Direction, Formulaire, Saisie, MARQUEUR_ERREUR_DEFAUT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Commande {
    Jeton(String),
    EffacerArriere,
    SupprimerAvant,
    Effacer,
    Curseur(Direction),
    Debut,
    Fin,
    PlacerCurseur(usize),
    Soumettre,
    UtiliserHistorique {
        valeur: String,
        est_expression: bool,
        expression_originale: Option<String>,
    },
    BasculerMenu,
    BasculerHistorique,
    FermerHistorique,
    ClicDocument(Cible),
    BasculerModeAngle,
    EffacerHistorique,
    ChangerCalculatrice(TypeCalculatrice),
}

impl Commande {
    /// Commandes qui mènent vers une autre page du serveur.
    pub fn quitte_la_page(&self) -> bool {
        matches!(
            self,
            Commande::BasculerModeAngle
                | Commande::EffacerHistorique
                | Commande::ChangerCalculatrice(_)
        )
    }
}

/// Ce que la vue doit faire après une commande.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effet {
    Aucun,
    Soumettre(Formulaire),
    /// Navigation complète vers une route du serveur.
    Naviguer(&'static str),
}

#[derive(Clone, Debug)]
pub struct Pilote {
    pub saisie: Saisie,
    pub panneaux: Panneaux,
    pub mode_angle: ModeAngle,
    pub calculatrice: TypeCalculatrice,
    marqueur_erreur: String,
}

impl Default for Pilote {
    fn default() -> Self {
        Self::new(MARQUEUR_ERREUR_DEFAUT)
    }
}

impl Pilote {
    pub fn new(marqueur_erreur: impl Into<String>) -> Self {
        Self {
            saisie: Saisie::new(),
            panneaux: Panneaux::default(),
            mode_angle: ModeAngle::default(),
            calculatrice: TypeCalculatrice::default(),
            marqueur_erreur: marqueur_erreur.into(),
        }
    }

    /// Page chargée avec `valeur` déjà dans le champ.
    pub fn charger(&mut self, valeur: &str) {
        self.saisie = Saisie::au_chargement(valeur, &self.marqueur_erreur);
    }

    /// Le rendu du serveur est arrivé (remplace l’ancien délai fixe).
    pub fn rendu_termine(&mut self, valeur: &str) {
        self.saisie.rendu_termine(valeur, &self.marqueur_erreur);
        info!(valeur, resultat = self.saisie.resultat_affiche(), "rendu reçu");
    }

    pub fn appliquer(&mut self, commande: Commande) -> Effet {
        debug!(?commande, "commande");
        if self.saisie.en_attente() && commande.quitte_la_page() {
            // Le rendu de la soumission en cours appartient à cette page.
            debug!(?commande, "ignorée : soumission en cours");
            return Effet::Aucun;
        }
        match commande {
            Commande::Jeton(j) => self.saisie.ajouter_jeton(&j),
            Commande::EffacerArriere => self.saisie.effacer_arriere(),
            Commande::SupprimerAvant => self.saisie.supprimer_avant(),
            Commande::Effacer => self.saisie.effacer(),
            Commande::Curseur(d) => self.saisie.deplacer(d),
            Commande::Debut => self.saisie.aller_debut(),
            Commande::Fin => self.saisie.aller_fin(),
            Commande::PlacerCurseur(p) => self.saisie.placer_curseur(p),
            Commande::Soumettre => {
                return match self.saisie.soumettre() {
                    Some(f) => {
                        info!(expression = %f.expression, "soumission");
                        Effet::Soumettre(f)
                    }
                    None => Effet::Aucun,
                };
            }
            Commande::UtiliserHistorique {
                valeur,
                est_expression,
                expression_originale,
            } => {
                self.saisie.utiliser_historique(
                    &valeur,
                    est_expression,
                    expression_originale.as_deref(),
                );
                self.panneaux.historique.fermer();
            }
            Commande::BasculerMenu => self.panneaux.menu.basculer(),
            Commande::BasculerHistorique => self.panneaux.historique.basculer(),
            Commande::FermerHistorique => self.panneaux.historique.fermer(),
            Commande::ClicDocument(cible) => self.panneaux.clic_document(cible),
            Commande::BasculerModeAngle => {
                // Optimiste : l’indicateur change avant la réponse du serveur.
                self.mode_angle = self.mode_angle.basculer();
                return Effet::Naviguer(ROUTE_MODE_ANGLE);
            }
            Commande::EffacerHistorique => {
                self.panneaux.historique.fermer();
                return Effet::Naviguer(self.calculatrice.route_effacer_historique());
            }
            Commande::ChangerCalculatrice(t) => {
                self.panneaux.menu.fermer();
                self.calculatrice = t;
                self.saisie.effacer();
                return Effet::Naviguer(t.route());
            }
        }
        Effet::Aucun
    }
}
