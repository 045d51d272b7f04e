// src/web.rs
//
// Liaison DOM (wasm32) : page rendue par le serveur
// -------------------------------------------------
// But:
// - Le pilote est la seule source de vérité ; le champ #display n’en est que le reflet.
// - Les événements du DOM deviennent des `Commande`, les `Effet` deviennent
//   soumission de formulaire ou navigation.
// - Les fonctions appelées par le gabarit HTML gardent leurs noms historiques
//   (appendToDisplay, useHistoryItem, ...).
//
// Fin de soumission : la page est re-rendue, `start()` repart et relit le champ.
// Aucun délai : le chargement de la nouvelle page EST le signal de fin.

mod journal;

use std::cell::RefCell;

use tracing::{debug, info, warn};
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    window, Document, Element, Event, EventTarget, HtmlFormElement, HtmlInputElement,
    KeyboardEvent, MouseEvent, Node,
};

use crate::pilote::{
    interpreter, Cible, Commande, Direction, Effet, Formulaire, ModeAngle, Modificateurs, Pilote,
    TypeCalculatrice,
};

/* ------------------------ Ids du gabarit ------------------------ */

const ID_AFFICHAGE: &str = "display";
const ID_MENU: &str = "mainDropdown";
const ID_BOUTON_MENU: &str = "dropdownButton";
const ID_CONTENU_MENU: &str = "dropdownContent";
const ID_BOUTON_HISTORIQUE: &str = "historyButton";
const ID_HISTORIQUE: &str = "historyPanel";
const ID_FERMER_HISTORIQUE: &str = "closeHistoryBtn";
const ID_MODE_ANGLE: &str = "angleModeToggle";

/// Champ caché ajouté au formulaire quand une expression est portée.
const CHAMP_ORIGINE: &str = "original_expression";

const CLASSE_VISIBLE: &str = "show";
const CLASSE_ACTIF: &str = "active";

struct Page {
    pilote: Pilote,
    document: Document,
    affichage: HtmlInputElement,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// Accès au pilote. `None` si la page n’est pas prête ou déjà empruntée
/// (un `focus()` peut déclencher un événement pendant qu’on écrit le champ).
fn avec_page<R>(f: impl FnOnce(&mut Page) -> R) -> Option<R> {
    PAGE.with(|p| {
        let mut garde = p.try_borrow_mut().ok()?;
        garde.as_mut().map(f)
    })
}

fn executer(commande: Commande) {
    avec_page(|page| page.executer(commande));
}

/* ------------------------ Point d’entrée ------------------------ */

/// Chargement de la page : lit la valeur rendue, branche les événements.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    journal::installer();

    let w = window().ok_or_else(|| js_err("window() indisponible"))?;
    let d = w
        .document()
        .ok_or_else(|| js_err("document() indisponible"))?;

    let affichage: HtmlInputElement = d
        .get_element_by_id(ID_AFFICHAGE)
        .ok_or_else(|| js_err("champ #display introuvable"))?
        .dyn_into()
        .map_err(|_| js_err("#display n’est pas un <input>"))?;

    // Curseur visible et déplaçable ; la saisie directe reste bloquée au clavier.
    affichage.remove_attribute("readonly")?;

    let mut pilote = match affichage.get_attribute("data-error-marker") {
        Some(m) if !m.is_empty() => Pilote::new(m),
        _ => Pilote::default(),
    };
    pilote.calculatrice = TypeCalculatrice::depuis_chemin(&w.location().pathname()?);
    if let Some(mode) = d
        .get_element_by_id(ID_MODE_ANGLE)
        .and_then(|e| e.get_attribute("data-mode"))
        .and_then(|m| ModeAngle::depuis_serveur(&m))
    {
        pilote.mode_angle = mode;
    }
    pilote.charger(&affichage.value());

    PAGE.with(|p| {
        *p.borrow_mut() = Some(Page {
            pilote,
            document: d.clone(),
            affichage: affichage.clone(),
        })
    });

    brancher(&d, &affichage)?;
    avec_page(|page| {
        info!(
            calculatrice = page.pilote.calculatrice.nom(),
            resultat = page.pilote.saisie.resultat_affiche(),
            "page chargée"
        );
        page.rendre(false);
    });
    Ok(())
}

fn brancher(d: &Document, affichage: &HtmlInputElement) -> Result<(), JsValue> {
    // Clavier : toute la page (le champ n’est pas la seule cible possible).
    ecouter(d, "keydown", |e: KeyboardEvent| {
        let champ_focus = avec_page(|p| p.champ_focus()).unwrap_or(false);
        let modificateurs = Modificateurs {
            ctrl: e.ctrl_key(),
            meta: e.meta_key(),
            alt: e.alt_key(),
        };
        let decision = interpreter(&e.key(), modificateurs, champ_focus);
        if decision.bloquer_defaut {
            e.prevent_default();
        }
        if let Some(c) = decision.commande {
            executer(c);
        }
    })?;

    // Clic dans le champ : le navigateur place le curseur, on le relit.
    ecouter(affichage, "mouseup", |_: MouseEvent| {
        avec_page(|p| {
            p.lire_curseur();
        });
    })?;

    if let Some(bouton) = d.get_element_by_id(ID_BOUTON_MENU) {
        ecouter(&bouton, "click", |e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            executer(Commande::BasculerMenu);
        })?;
    }

    if let Some(bouton) = d.get_element_by_id(ID_BOUTON_HISTORIQUE) {
        ecouter(&bouton, "click", |e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            executer(Commande::BasculerHistorique);
        })?;
    }

    if let Some(fermer) = d.get_element_by_id(ID_FERMER_HISTORIQUE) {
        ecouter(&fermer, "click", |_: MouseEvent| {
            executer(Commande::FermerHistorique);
        })?;
    }

    if let Some(bascule) = d.get_element_by_id(ID_MODE_ANGLE) {
        ecouter(&bascule, "click", |e: MouseEvent| {
            e.prevent_default();
            executer(Commande::BasculerModeAngle);
        })?;
    }

    // Clic ailleurs : ferme menu / historique.
    ecouter(d, "click", |e: MouseEvent| {
        let cible = e.target().and_then(|t| t.dyn_into::<Node>().ok());
        avec_page(|p| {
            let c = p.cible(cible.as_ref());
            p.executer(Commande::ClicDocument(c));
        });
    })?;

    // Bouton "=" du gabarit (submit natif).
    if let Some(form) = formulaire(d) {
        ecouter(&form, "submit", |e: Event| {
            let partir = avec_page(|p| p.soumission_native()).unwrap_or(false);
            if !partir {
                e.prevent_default();
            }
        })?;
    }

    Ok(())
}

/* ------------------------ Page ------------------------ */

impl Page {
    fn executer(&mut self, commande: Commande) {
        if !matches!(commande, Commande::UtiliserHistorique { .. }) {
            self.lire_curseur();
        }
        // Les clics de panneaux ne volent pas le focus.
        let focus = !matches!(
            commande,
            Commande::ClicDocument(_)
                | Commande::BasculerMenu
                | Commande::BasculerHistorique
                | Commande::FermerHistorique
        );
        let effet = self.pilote.appliquer(commande);
        self.rendre(focus);
        match effet {
            Effet::Aucun => {}
            Effet::Soumettre(f) => {
                if let Err(e) = self.soumettre(&f) {
                    self.pilote.saisie.soumission_echouee();
                    warn!(?e, "soumission impossible");
                }
            }
            Effet::Naviguer(route) => {
                let navigation = window()
                    .ok_or_else(|| js_err("window() indisponible"))
                    .and_then(|w| w.location().set_href(route));
                if let Err(e) = navigation {
                    warn!(?e, route, "navigation impossible");
                }
            }
        }
    }

    /// Reflète l’état du pilote dans le DOM.
    fn rendre(&self, focus: bool) {
        let saisie = &self.pilote.saisie;
        if self.affichage.value() != saisie.valeur() {
            self.affichage.set_value(saisie.valeur());
        }
        if focus {
            if let Err(e) = self.affichage.focus() {
                debug!(?e, "focus refusé");
            }
        }
        let pos = saisie.vers_utf16(saisie.curseur());
        if let Err(e) = self.affichage.set_selection_range(pos, pos) {
            debug!(?e, pos, "sélection refusée");
        }

        let panneaux = self.pilote.panneaux;
        self.basculer_classe(ID_CONTENU_MENU, CLASSE_VISIBLE, panneaux.menu.est_ouvert());
        self.basculer_classe(
            ID_HISTORIQUE,
            CLASSE_VISIBLE,
            panneaux.historique.est_ouvert(),
        );

        if let Some(bascule) = self.document.get_element_by_id(ID_MODE_ANGLE) {
            let degres = self.pilote.mode_angle == ModeAngle::Degres;
            let mode = if degres { "deg" } else { "rad" };
            let maj = bascule
                .class_list()
                .toggle_with_force(CLASSE_ACTIF, degres)
                .and_then(|_| bascule.set_attribute("data-mode", mode));
            if let Err(e) = maj {
                debug!(?e, "indicateur d’angle non mis à jour");
            }
        }
    }

    fn basculer_classe(&self, id: &str, classe: &str, presente: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            if let Err(e) = el.class_list().toggle_with_force(classe, presente) {
                debug!(?e, id, classe, "classe non basculée");
            }
        }
    }

    /// selectionStart (UTF-16) -> curseur du pilote.
    fn lire_curseur(&mut self) {
        if let Ok(Some(u)) = self.affichage.selection_start() {
            let pos = self.pilote.saisie.depuis_utf16(u);
            self.pilote.appliquer(Commande::PlacerCurseur(pos));
        }
    }

    fn champ_focus(&self) -> bool {
        let actif: Option<Element> = self.document.active_element();
        let champ: &Element = self.affichage.as_ref();
        actif.as_ref() == Some(champ)
    }

    fn cible(&self, noeud: Option<&Node>) -> Cible {
        let contient = |id: &str| {
            self.document
                .get_element_by_id(id)
                .is_some_and(|el| el.contains(noeud))
        };
        Cible {
            dans_menu: contient(ID_MENU),
            dans_historique: contient(ID_HISTORIQUE),
            sur_bouton_historique: contient(ID_BOUTON_HISTORIQUE),
        }
    }

    /// Soumission par le bouton du formulaire : vrai si la page doit partir.
    fn soumission_native(&mut self) -> bool {
        match self.pilote.appliquer(Commande::Soumettre) {
            Effet::Soumettre(f) => match self.preparer_formulaire(&f) {
                Ok(_) => true,
                Err(e) => {
                    self.pilote.saisie.soumission_echouee();
                    warn!(?e, "soumission impossible");
                    false
                }
            },
            _ => false,
        }
    }

    /// Soumission déclenchée par le clavier ou `submitDisplay()`.
    fn soumettre(&self, f: &Formulaire) -> Result<(), JsValue> {
        let form = self.preparer_formulaire(f)?;
        form.submit()
    }

    fn preparer_formulaire(&self, f: &Formulaire) -> Result<HtmlFormElement, JsValue> {
        let form = formulaire(&self.document).ok_or_else(|| js_err("formulaire introuvable"))?;
        self.affichage.set_value(&f.expression);

        if let Some(origine) = &f.expression_originale {
            let champ: HtmlInputElement = match form.query_selector(&format!(
                "input[name=\"{CHAMP_ORIGINE}\"]"
            ))? {
                Some(el) => el.dyn_into().map_err(|_| js_err("champ caché invalide"))?,
                None => {
                    let el: HtmlInputElement = self.document.create_element("input")?.dyn_into()?;
                    el.set_type("hidden");
                    el.set_name(CHAMP_ORIGINE);
                    form.append_child(&el)?;
                    el
                }
            };
            champ.set_value(origine);
        }
        info!(expression = %f.expression, "formulaire soumis");
        Ok(form)
    }
}

/* ------------------------ Fonctions du gabarit ------------------------ */

#[wasm_bindgen(js_name = appendToDisplay)]
pub fn append_to_display(jeton: String) {
    executer(Commande::Jeton(jeton));
}

#[wasm_bindgen(js_name = clearDisplay)]
pub fn clear_display() {
    executer(Commande::Effacer);
}

#[wasm_bindgen(js_name = backspaceDisplay)]
pub fn backspace_display() {
    executer(Commande::EffacerArriere);
}

#[wasm_bindgen(js_name = moveCursorLeft)]
pub fn move_cursor_left() {
    executer(Commande::Curseur(Direction::Gauche));
}

#[wasm_bindgen(js_name = moveCursorRight)]
pub fn move_cursor_right() {
    executer(Commande::Curseur(Direction::Droite));
}

#[wasm_bindgen(js_name = submitDisplay)]
pub fn submit_display() {
    executer(Commande::Soumettre);
}

#[wasm_bindgen(js_name = clearHistory)]
pub fn clear_history() {
    executer(Commande::EffacerHistorique);
}

/// `useHistoryItem(valeur, estExpression, expressionOriginale)`.
/// Ancien gabarit : `useHistoryItem(expression, resultat)` -> expression éditable.
#[wasm_bindgen(js_name = useHistoryItem)]
pub fn use_history_item(
    valeur: String,
    est_expression: Option<bool>,
    expression_originale: Option<String>,
) {
    executer(Commande::UtiliserHistorique {
        valeur,
        est_expression: est_expression.unwrap_or(true),
        expression_originale,
    });
}

/* ------------------------ Utilitaires ------------------------ */

fn formulaire(d: &Document) -> Option<HtmlFormElement> {
    d.query_selector("form")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into().ok())
}

/// Écouteur permanent (la page vit jusqu’à la prochaine navigation).
fn ecouter<E>(
    cible: &EventTarget,
    type_evenement: &str,
    f: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let rappel = Closure::<dyn FnMut(E)>::new(f);
    cible.add_event_listener_with_callback(type_evenement, rappel.as_ref().unchecked_ref())?;
    rappel.forget();
    Ok(())
}

fn js_err(msg: &str) -> JsValue {
    JsValue::from_str(msg)
}
