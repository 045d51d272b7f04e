//! src/pilote/saisie.rs
//!
//! État de saisie : le texte de l’affichage, le curseur, et le mode “résultat”.
//!
//! Contrats :
//! - Aucune évaluation ici (le serveur calcule, pas nous).
//! - Le curseur compte des caractères (pas des octets) et reste dans [0, longueur].
//! - `expression_portee` n’est lue que pendant le mode résultat, et vidée à la consommation.

use tracing::debug;

use super::jetons::{classer, Categorie};

/// Marqueur d’erreur rendu par le serveur dans le champ (“Erro: …”).
pub const MARQUEUR_ERREUR_DEFAUT: &str = "Erro";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Gauche,
    Droite,
}

/// Ce qui part vers le serveur lors d’une soumission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formulaire {
    pub expression: String,
    /// Expression d’origine d’un résultat repris de l’historique (champ caché).
    pub expression_originale: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Saisie {
    tampon: String,
    curseur: usize,
    resultat_affiche: bool,
    expression_portee: Option<String>,
    en_attente: bool,
}

impl Saisie {
    pub fn new() -> Self {
        Self::default()
    }

    /// État au chargement de la page : valeur déjà rendue dans le champ.
    ///
    /// Une valeur non vide est un résultat, sauf si elle contient le marqueur d’erreur
    /// (l’utilisateur doit pouvoir corriger et relancer).
    pub fn au_chargement(valeur: &str, marqueur_erreur: &str) -> Self {
        let resultat_affiche = !valeur.is_empty() && !valeur.contains(marqueur_erreur);
        let s = Self {
            tampon: valeur.to_string(),
            curseur: valeur.chars().count(),
            resultat_affiche,
            expression_portee: None,
            en_attente: false,
        };
        debug!(valeur, resultat_affiche, "saisie chargée");
        s
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn valeur(&self) -> &str {
        &self.tampon
    }

    pub fn curseur(&self) -> usize {
        self.curseur
    }

    pub fn longueur(&self) -> usize {
        self.tampon.chars().count()
    }

    pub fn resultat_affiche(&self) -> bool {
        self.resultat_affiche
    }

    pub fn expression_portee(&self) -> Option<&str> {
        self.expression_portee.as_deref()
    }

    pub fn en_attente(&self) -> bool {
        self.en_attente
    }

    /* ------------------------ Édition ------------------------ */

    /// Insère un jeton (chiffre, opérateur, constante, ou “f(”).
    pub fn ajouter_jeton(&mut self, jeton: &str) {
        if self.en_attente || jeton.is_empty() {
            return;
        }
        let categorie = classer(jeton);

        if self.resultat_affiche {
            // `take()` : l’expression portée est consommée quelle que soit la branche.
            self.tampon = match (categorie, self.expression_portee.take()) {
                (Categorie::Simple, _) => jeton.to_string(),
                (Categorie::Fonction, Some(origine)) => format!("{jeton}{origine})"),
                (_, Some(origine)) => format!("({origine}){jeton}"),
                (Categorie::Fonction, None) => format!("{jeton}{})", self.tampon),
                (_, None) => format!("{}{jeton}", self.tampon),
            };
            self.resultat_affiche = false;
            self.curseur = self.longueur();
            debug!(jeton, tampon = %self.tampon, "jeton sur résultat");
            return;
        }

        let i = self.octet(self.curseur);
        if categorie == Categorie::Fonction {
            // Parenthèse fermante automatique, curseur entre les deux.
            self.tampon.insert_str(i, &format!("{jeton})"));
        } else {
            self.tampon.insert_str(i, jeton);
        }
        self.curseur += jeton.chars().count();

        if !categorie.est_operateur() {
            self.expression_portee = None;
        }
    }

    /// Backspace : retire le caractère juste avant le curseur.
    pub fn effacer_arriere(&mut self) {
        if self.en_attente || self.curseur == 0 {
            return;
        }
        let debut = self.octet(self.curseur - 1);
        let fin = self.octet(self.curseur);
        self.tampon.replace_range(debut..fin, "");
        self.curseur -= 1;
        self.sortir_du_resultat();
    }

    /// Suppr : retire le caractère sous le curseur (le curseur ne bouge pas).
    pub fn supprimer_avant(&mut self) {
        if self.en_attente || self.curseur >= self.longueur() {
            return;
        }
        let debut = self.octet(self.curseur);
        let fin = self.octet(self.curseur + 1);
        self.tampon.replace_range(debut..fin, "");
        self.sortir_du_resultat();
    }

    /// C : tout remettre à zéro, quel que soit l’état précédent.
    ///
    /// Ignoré pendant une soumission : le rendu attendu écrasera le champ.
    pub fn effacer(&mut self) {
        if self.en_attente {
            return;
        }
        self.tampon.clear();
        self.curseur = 0;
        self.resultat_affiche = false;
        self.expression_portee = None;
    }

    /* ------------------------ Curseur ------------------------ */

    pub fn deplacer(&mut self, direction: Direction) {
        match direction {
            Direction::Gauche if self.curseur > 0 => self.curseur -= 1,
            Direction::Droite if self.curseur < self.longueur() => self.curseur += 1,
            _ => {}
        }
    }

    pub fn aller_debut(&mut self) {
        self.curseur = 0;
    }

    pub fn aller_fin(&mut self) {
        self.curseur = self.longueur();
    }

    /// Position venue de l’extérieur (clic souris, sélection DOM) : ramenée dans les bornes.
    pub fn placer_curseur(&mut self, position: usize) {
        self.curseur = position.min(self.longueur());
    }

    /* ------------------------ Serveur ------------------------ */

    /// Prépare la soumission. `None` si une soumission est déjà partie.
    pub fn soumettre(&mut self) -> Option<Formulaire> {
        if self.en_attente {
            return None;
        }
        self.en_attente = true;
        let expression_originale = if self.resultat_affiche {
            self.expression_portee.clone()
        } else {
            None
        };
        Some(Formulaire {
            expression: self.tampon.clone(),
            expression_originale,
        })
    }

    /// Signal explicite : le serveur a rendu `valeur` dans le champ.
    pub fn rendu_termine(&mut self, valeur: &str, marqueur_erreur: &str) {
        *self = Self::au_chargement(valeur, marqueur_erreur);
    }

    /// La soumission n’a pas abouti : on rend la main sans toucher au texte.
    pub fn soumission_echouee(&mut self) {
        self.en_attente = false;
    }

    /// Reprise d’une entrée d’historique (expression à éditer, ou résultat à enchaîner).
    pub fn utiliser_historique(
        &mut self,
        valeur: &str,
        est_expression: bool,
        expression_originale: Option<&str>,
    ) {
        if self.en_attente {
            return;
        }
        self.tampon = valeur.to_string();
        self.curseur = self.longueur();
        self.resultat_affiche = !est_expression;
        self.expression_portee = if est_expression {
            None
        } else {
            expression_originale
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        };
        debug!(valeur, est_expression, "entrée d’historique reprise");
    }

    /* ------------------------ UTF-16 (selectionStart du DOM) ------------------------ */

    /// Position caractère -> décalage UTF-16.
    pub fn vers_utf16(&self, position: usize) -> u32 {
        self.tampon
            .chars()
            .take(position)
            .map(|c| c.len_utf16() as u32)
            .sum()
    }

    /// Décalage UTF-16 -> position caractère (bornée).
    pub fn depuis_utf16(&self, decalage: u32) -> usize {
        let mut cumul = 0u32;
        for (n, c) in self.tampon.chars().enumerate() {
            if cumul >= decalage {
                return n;
            }
            cumul += c.len_utf16() as u32;
        }
        self.longueur()
    }

    /* ------------------------ Interne ------------------------ */

    fn octet(&self, position: usize) -> usize {
        self.tampon
            .char_indices()
            .nth(position)
            .map_or(self.tampon.len(), |(i, _)| i)
    }

    fn sortir_du_resultat(&mut self) {
        self.resultat_affiche = false;
        self.expression_portee = None;
    }
}
