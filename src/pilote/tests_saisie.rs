//! Tests de saisie : composition résultat / expression, curseur, chargement, historique.

use pretty_assertions::assert_eq;

use super::commande::{Commande, Effet, Pilote};
use super::routes::{ModeAngle, TypeCalculatrice};
use super::saisie::{Direction, Formulaire, Saisie, MARQUEUR_ERREUR_DEFAUT};

/// Saisie en cours d’édition : texte donné, curseur en fin.
fn en_edition(texte: &str) -> Saisie {
    let mut s = Saisie::new();
    for c in texte.chars() {
        s.ajouter_jeton(&c.to_string());
    }
    s
}

fn resultat(valeur: &str) -> Saisie {
    Saisie::au_chargement(valeur, MARQUEUR_ERREUR_DEFAUT)
}

fn etat(s: &Saisie) -> (&str, usize, bool, Option<&str>) {
    (
        s.valeur(),
        s.curseur(),
        s.resultat_affiche(),
        s.expression_portee(),
    )
}

/* ------------------------ Mode résultat ------------------------ */

#[test]
fn chiffre_sur_resultat_remplace() {
    let mut s = resultat("42");
    s.ajouter_jeton("7");
    assert_eq!(etat(&s), ("7", 1, false, None));
}

#[test]
fn operateur_sur_resultat_prolonge() {
    let mut s = resultat("42");
    s.ajouter_jeton("+");
    assert_eq!(etat(&s), ("42+", 3, false, None));
}

#[test]
fn puissance_sur_resultat_prolonge() {
    let mut s = resultat("2");
    s.ajouter_jeton("**");
    assert_eq!(s.valeur(), "2**");
}

#[test]
fn fonction_sur_resultat_enveloppe() {
    let mut s = resultat("0.5");
    s.ajouter_jeton("sin(");
    assert_eq!(etat(&s), ("sin(0.5)", 8, false, None));
}

#[test]
fn operateur_apres_historique_reconstruit_expression() {
    let mut s = Saisie::new();
    s.utiliser_historique("7", false, Some("3+4"));
    s.ajouter_jeton("+");
    assert_eq!(etat(&s), ("(3+4)+", 6, false, None));
}

#[test]
fn fonction_apres_historique_enveloppe_expression_originale() {
    let mut s = Saisie::new();
    s.utiliser_historique("7", false, Some("3+4"));
    s.ajouter_jeton("sqrt(");
    assert_eq!(etat(&s), ("sqrt(3+4)", 9, false, None));
}

#[test]
fn chiffre_apres_historique_oublie_expression_portee() {
    let mut s = Saisie::new();
    s.utiliser_historique("12", false, Some("3*4"));
    s.ajouter_jeton("5");
    assert_eq!(etat(&s), ("5", 1, false, None));

    // Un opérateur ensuite ne reconstruit plus rien.
    s.ajouter_jeton("+");
    assert_eq!(s.valeur(), "5+");
}

#[test]
fn historique_resultat_puis_plus() {
    let mut s = Saisie::new();
    s.utiliser_historique("12", false, Some("3*4"));
    assert_eq!(etat(&s), ("12", 2, true, Some("3*4")));
    s.ajouter_jeton("+");
    assert_eq!(s.valeur(), "(3*4)+");
    assert_eq!(s.expression_portee(), None);
}

#[test]
fn historique_expression_reste_editable() {
    let mut s = resultat("99");
    s.utiliser_historique("3*4", true, Some("ignoré"));
    assert_eq!(etat(&s), ("3*4", 3, false, None));
    s.ajouter_jeton("2");
    assert_eq!(s.valeur(), "3*42");
}

#[test]
fn historique_sans_origine_enchaine_sur_la_valeur() {
    let mut s = Saisie::new();
    s.utiliser_historique("12", false, Some(""));
    assert_eq!(s.expression_portee(), None);
    s.ajouter_jeton("-");
    assert_eq!(s.valeur(), "12-");
}

/* ------------------------ Mode normal ------------------------ */

#[test]
fn fonction_inseree_au_curseur_avec_fermante() {
    let mut s = en_edition("12");
    assert_eq!(s.curseur(), 2);
    s.ajouter_jeton("sin(");
    assert_eq!(etat(&s), ("12sin()", 6, false, None));
    s.ajouter_jeton("3");
    assert_eq!(s.valeur(), "12sin(3)");
}

#[test]
fn insertion_au_milieu() {
    let mut s = en_edition("1+3");
    s.deplacer(Direction::Gauche);
    s.ajouter_jeton("2");
    assert_eq!(etat(&s), ("1+23", 3, false, None));
}

#[test]
fn insertion_multioctet() {
    let mut s = en_edition("2÷3");
    s.aller_debut();
    s.deplacer(Direction::Droite);
    s.deplacer(Direction::Droite);
    s.ajouter_jeton("×");
    assert_eq!(s.valeur(), "2÷×3");
    assert_eq!(s.curseur(), 3);
}

/* ------------------------ Effacement ------------------------ */

#[test]
fn effacer_arriere_au_debut_ne_fait_rien() {
    let mut vide = Saisie::new();
    vide.effacer_arriere();
    assert_eq!(etat(&vide), ("", 0, false, None));

    let mut s = en_edition("12");
    s.aller_debut();
    s.effacer_arriere();
    assert_eq!(etat(&s), ("12", 0, false, None));
}

#[test]
fn effacer_arriere_au_milieu() {
    let mut s = en_edition("1×2");
    s.deplacer(Direction::Gauche);
    s.effacer_arriere();
    assert_eq!(etat(&s), ("12", 1, false, None));
}

#[test]
fn effacer_arriere_sur_resultat_sort_du_mode_resultat() {
    let mut s = resultat("42");
    s.effacer_arriere();
    assert_eq!(etat(&s), ("4", 1, false, None));
    s.ajouter_jeton("5");
    assert_eq!(s.valeur(), "45");
}

#[test]
fn supprimer_avant() {
    let mut s = en_edition("123");
    s.aller_debut();
    s.supprimer_avant();
    assert_eq!(etat(&s), ("23", 0, false, None));

    s.aller_fin();
    s.supprimer_avant();
    assert_eq!(etat(&s), ("23", 2, false, None));
}

#[test]
fn effacer_remet_tout_a_zero() {
    let mut s = Saisie::new();
    s.utiliser_historique("12", false, Some("3*4"));
    s.effacer();
    assert_eq!(etat(&s), ("", 0, false, None));

    let mut t = en_edition("1+2");
    t.effacer();
    assert_eq!(etat(&t), ("", 0, false, None));
}

/* ------------------------ Curseur ------------------------ */

#[test]
fn curseur_bloque_aux_bornes() {
    let mut s = en_edition("12");
    s.deplacer(Direction::Droite);
    assert_eq!(s.curseur(), 2);
    s.aller_debut();
    s.deplacer(Direction::Gauche);
    assert_eq!(s.curseur(), 0);
    s.placer_curseur(99);
    assert_eq!(s.curseur(), 2);
}

#[test]
fn conversions_utf16() {
    let s = en_edition("2×π");
    assert_eq!(s.vers_utf16(3), 3);
    assert_eq!(s.depuis_utf16(2), 2);
    assert_eq!(s.depuis_utf16(50), 3);

    let mut large = Saisie::new();
    large.utiliser_historique("a😀b", true, None);
    assert_eq!(large.vers_utf16(2), 3);
    assert_eq!(large.depuis_utf16(3), 2);
}

/* ------------------------ Chargement + soumission ------------------------ */

#[test]
fn chargement_erreur_reste_editable() {
    let s = resultat("Erro: divisão por zero");
    assert!(!s.resultat_affiche());
    assert_eq!(s.curseur(), "Erro: divisão por zero".chars().count());

    assert!(resultat("42").resultat_affiche());
    assert!(!resultat("").resultat_affiche());
}

#[test]
fn soumission_puis_rendu() {
    let mut s = en_edition("6*7");
    let f = s.soumettre();
    assert_eq!(
        f,
        Some(Formulaire {
            expression: "6*7".into(),
            expression_originale: None,
        })
    );
    assert!(s.en_attente());

    // Pendant la navigation : rien ne bouge, pas de double envoi.
    s.ajouter_jeton("1");
    assert_eq!(s.valeur(), "6*7");
    assert_eq!(s.soumettre(), None);

    s.rendu_termine("42", MARQUEUR_ERREUR_DEFAUT);
    assert_eq!(etat(&s), ("42", 2, true, None));
    assert!(!s.en_attente());
}

#[test]
fn soumission_avec_expression_portee() {
    let mut s = Saisie::new();
    s.utiliser_historique("12", false, Some("3*4"));
    let f = s.soumettre();
    assert_eq!(
        f.and_then(|f| f.expression_originale),
        Some("3*4".to_string())
    );
}

#[test]
fn rendu_en_erreur_puis_correction() {
    let mut s = en_edition("1/0");
    s.soumettre();
    s.rendu_termine("Erro: division by zero", MARQUEUR_ERREUR_DEFAUT);
    assert!(!s.resultat_affiche());
    s.effacer();
    s.ajouter_jeton("1");
    assert_eq!(s.valeur(), "1");
}

#[test]
fn effacer_et_historique_ignores_pendant_soumission() {
    let mut s = en_edition("6*7");
    s.soumettre();
    s.effacer();
    s.utiliser_historique("12", false, Some("3*4"));
    assert_eq!(etat(&s), ("6*7", 3, false, None));

    s.rendu_termine("42", MARQUEUR_ERREUR_DEFAUT);
    s.effacer();
    assert_eq!(etat(&s), ("", 0, false, None));
}

#[test]
fn soumission_echouee_rend_la_main() {
    let mut s = en_edition("1+1");
    s.soumettre();
    s.soumission_echouee();
    s.ajouter_jeton("1");
    assert_eq!(s.valeur(), "1+11");
}

/* ------------------------ Pilote (commandes -> effets) ------------------------ */

#[test]
fn pilote_historique_ferme_le_panneau() {
    let mut p = Pilote::default();
    p.appliquer(Commande::BasculerHistorique);
    assert!(p.panneaux.historique.est_ouvert());

    let e = p.appliquer(Commande::UtiliserHistorique {
        valeur: "12".into(),
        est_expression: false,
        expression_originale: Some("3*4".into()),
    });
    assert_eq!(e, Effet::Aucun);
    assert!(!p.panneaux.historique.est_ouvert());
    assert!(p.saisie.resultat_affiche());
}

#[test]
fn pilote_soumettre_donne_un_formulaire() {
    let mut p = Pilote::default();
    p.appliquer(Commande::Jeton("2".into()));
    match p.appliquer(Commande::Soumettre) {
        Effet::Soumettre(f) => assert_eq!(f.expression, "2"),
        autre => panic!("effet inattendu: {autre:?}"),
    }
    assert_eq!(p.appliquer(Commande::Soumettre), Effet::Aucun);

    p.rendu_termine("2");
    assert!(p.saisie.resultat_affiche());
}

#[test]
fn pilote_mode_angle_optimiste() {
    let mut p = Pilote::default();
    let e = p.appliquer(Commande::BasculerModeAngle);
    assert_eq!(e, Effet::Naviguer("/toggle_angle_mode"));
    assert_eq!(p.mode_angle, ModeAngle::Degres);
}

#[test]
fn pilote_changer_calculatrice() {
    let mut p = Pilote::default();
    p.appliquer(Commande::Jeton("1".into()));
    p.appliquer(Commande::BasculerMenu);
    let e = p.appliquer(Commande::ChangerCalculatrice(TypeCalculatrice::Quaternions));
    assert_eq!(e, Effet::Naviguer("/quaternions"));
    assert!(!p.panneaux.menu.est_ouvert());
    assert_eq!(p.saisie.valeur(), "");

    let e = p.appliquer(Commande::EffacerHistorique);
    assert_eq!(e, Effet::Naviguer("/clear_history/quaternion"));
}

#[test]
fn pilote_reste_sur_la_page_pendant_soumission() {
    let mut p = Pilote::default();
    p.appliquer(Commande::Jeton("6".into()));
    p.appliquer(Commande::Soumettre);

    for c in [
        Commande::ChangerCalculatrice(TypeCalculatrice::Quaternions),
        Commande::EffacerHistorique,
        Commande::BasculerModeAngle,
    ] {
        assert_eq!(p.appliquer(c), Effet::Aucun);
    }
    assert_eq!(p.calculatrice, TypeCalculatrice::Standard);
    assert_eq!(p.mode_angle, ModeAngle::Radians);
    assert_eq!(p.saisie.valeur(), "6");

    // Les panneaux restent utilisables.
    p.appliquer(Commande::BasculerMenu);
    assert!(p.panneaux.menu.est_ouvert());
}

#[test]
fn pilote_marqueur_personnalise() {
    let mut p = Pilote::new("Error");
    p.charger("Error: bad input");
    assert!(!p.saisie.resultat_affiche());
    p.charger("Erro: ok pour ce marqueur");
    assert!(p.saisie.resultat_affiche());
}
