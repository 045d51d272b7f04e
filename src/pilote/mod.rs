//! Pilote de saisie (sans vue, sans serveur)
//!
//! Organisation interne :
//! - jetons.rs   : opérateur / puissance / fonction / simple
//! - saisie.rs   : texte + curseur + mode résultat + expression portée
//! - panneaux.rs : menu déroulant + panneau d’historique
//! - routes.rs   : mode angulaire + type de calculatrice (routes serveur)
//! - touches.rs  : liste blanche clavier -> commandes
//! - commande.rs : `Pilote::appliquer` (commande -> effet)

pub mod commande;
pub mod jetons;
pub mod panneaux;
pub mod routes;
pub mod saisie;
pub mod touches;

#[cfg(test)]
mod tests_saisie;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use commande::{Commande, Effet, Pilote};
pub use panneaux::Cible;
pub use routes::{ModeAngle, TypeCalculatrice};
pub use saisie::{Direction, Formulaire};
pub use touches::{interpreter, Modificateurs};
