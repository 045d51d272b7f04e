//! Tests de propriétés : séquences aléatoires de commandes.
//!
//! Invariants vérifiés après CHAQUE commande :
//! - 0 <= curseur <= longueur
//! - expression portée => mode résultat
//! - effacer (hors soumission en cours) => état vide, quel que soit l’historique des commandes

use proptest::prelude::*;

use super::commande::{Commande, Pilote};
use super::saisie::Direction;

fn jeton() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "0", "7", ".", "+", "-", "×", "÷", "**", "(", ")", "sin(", "log(", "pi", "i",
    ])
    .prop_map(str::to_string)
}

fn commande() -> impl Strategy<Value = Commande> {
    prop_oneof![
        4 => jeton().prop_map(Commande::Jeton),
        1 => Just(Commande::EffacerArriere),
        1 => Just(Commande::SupprimerAvant),
        1 => Just(Commande::Curseur(Direction::Gauche)),
        1 => Just(Commande::Curseur(Direction::Droite)),
        1 => Just(Commande::Debut),
        1 => Just(Commande::Fin),
        1 => (0usize..40).prop_map(Commande::PlacerCurseur),
        1 => ("[0-9]{1,4}", any::<bool>(), prop::option::of("[0-9]\\+[0-9]")).prop_map(
            |(valeur, est_expression, expression_originale)| Commande::UtiliserHistorique {
                valeur,
                est_expression,
                expression_originale,
            }
        ),
        1 => Just(Commande::Soumettre),
    ]
}

proptest! {
    #[test]
    fn curseur_toujours_dans_les_bornes(
        depart in "[0-9]{0,5}",
        commandes in prop::collection::vec(commande(), 0..60),
    ) {
        let mut p = Pilote::default();
        p.charger(&depart);
        for c in commandes {
            let soumis = c == Commande::Soumettre;
            p.appliquer(c);
            if soumis && p.saisie.en_attente() {
                // Le serveur renvoie quelque chose ; la page est re-rendue.
                let rendu = p.saisie.valeur().to_string();
                p.rendu_termine(&rendu);
            }
            prop_assert!(!p.saisie.en_attente());
            prop_assert!(p.saisie.curseur() <= p.saisie.longueur());
            if p.saisie.expression_portee().is_some() {
                prop_assert!(p.saisie.resultat_affiche());
            }
        }
    }

    #[test]
    fn effacer_remet_toujours_a_zero(
        commandes in prop::collection::vec(commande(), 0..40),
    ) {
        let mut p = Pilote::default();
        for c in commandes {
            p.appliquer(c);
        }
        if p.saisie.en_attente() {
            p.saisie.soumission_echouee();
        }
        p.appliquer(Commande::Effacer);
        prop_assert_eq!(p.saisie.valeur(), "");
        prop_assert_eq!(p.saisie.curseur(), 0);
        prop_assert!(!p.saisie.resultat_affiche());
        prop_assert_eq!(p.saisie.expression_portee(), None);
    }
}
