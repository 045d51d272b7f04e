// src/pilote/touches.rs
//
// Clavier : liste blanche de touches -> commandes.
// Les noms suivent `KeyboardEvent.key` du DOM ("Enter", "ArrowLeft", "7", "s"...).
// La vue egui traduit ses propres touches vers ces noms avant d’appeler `interpreter`.

use super::commande::Commande;
use super::saisie::Direction;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modificateurs {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modificateurs {
    fn raccourci(self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub commande: Option<Commande>,
    /// Empêcher l’action par défaut du navigateur (saisie directe dans le champ).
    pub bloquer_defaut: bool,
}

pub fn interpreter(cle: &str, modificateurs: Modificateurs, champ_focus: bool) -> Decision {
    // Ctrl+R, Ctrl+C, etc. : on laisse passer, sans rien faire.
    if modificateurs.raccourci() {
        return Decision {
            commande: None,
            bloquer_defaut: false,
        };
    }

    match commande_pour(cle) {
        Some(commande) => Decision {
            commande: Some(commande),
            bloquer_defaut: true,
        },
        None => Decision {
            commande: None,
            bloquer_defaut: champ_focus,
        },
    }
}

fn commande_pour(cle: &str) -> Option<Commande> {
    let commande = match cle {
        "Enter" | "=" => Commande::Soumettre,
        "Escape" => Commande::Effacer,
        "Backspace" => Commande::EffacerArriere,
        "Delete" => Commande::SupprimerAvant,
        "Home" => Commande::Debut,
        "End" => Commande::Fin,
        "ArrowLeft" => Commande::Curseur(Direction::Gauche),
        "ArrowRight" => Commande::Curseur(Direction::Droite),
        _ => return jeton_pour(cle).map(|j| Commande::Jeton(j.to_string())),
    };
    Some(commande)
}

/// Touche imprimable -> jeton inséré.
fn jeton_pour(cle: &str) -> Option<&'static str> {
    let mut chars = cle.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    const CHIFFRES: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    if let Some(d) = c.to_digit(10) {
        return Some(CHIFFRES[d as usize]);
    }

    let jeton = match c.to_ascii_lowercase() {
        '+' => "+",
        '-' => "-",
        '*' => "*",
        '/' => "/",
        '×' => "×",
        '÷' => "÷",
        '^' => "**",
        '.' | ',' => ".",
        '(' => "(",
        ')' => ")",
        's' => "sin(",
        'c' => "cos(",
        't' => "tan(",
        'l' => "log(",
        'e' => "exp(",
        'p' | 'π' => "pi",
        'i' => "i",
        'j' => "j",
        'k' => "k",
        _ => return None,
    };
    Some(jeton)
}
