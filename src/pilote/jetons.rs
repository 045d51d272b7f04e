// src/pilote/jetons.rs
//
// Classification des jetons insérés dans l’affichage.
// Aucune analyse d’expression : on ne regarde que la forme du jeton.

/// Opérateurs binaires reconnus (ASCII + symboles du pavé).
pub const OPERATEURS: [&str; 6] = ["+", "-", "*", "/", "×", "÷"];

/// Formes acceptées pour la puissance (`**` côté serveur, `^` au clavier).
pub const PUISSANCES: [&str; 2] = ["**", "^"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Categorie {
    /// + - * / × ÷
    Operateur,
    /// ** ou ^
    Puissance,
    /// "sin(", "log(", ... (ouvre un appel)
    Fonction,
    /// chiffre, point, parenthèse seule, constante
    Simple,
}

impl Categorie {
    pub fn est_operateur(self) -> bool {
        matches!(self, Categorie::Operateur | Categorie::Puissance)
    }
}

pub fn classer(jeton: &str) -> Categorie {
    if OPERATEURS.contains(&jeton) {
        Categorie::Operateur
    } else if PUISSANCES.contains(&jeton) {
        Categorie::Puissance
    } else if est_fonction(jeton) {
        Categorie::Fonction
    } else {
        Categorie::Simple
    }
}

/// "sin(" oui, "(" non : la parenthèse seule reste un jeton simple.
fn est_fonction(jeton: &str) -> bool {
    jeton.chars().count() > 1 && jeton.ends_with('(')
}
