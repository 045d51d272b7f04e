// src/serveur.rs
//
// Frontière avec l’évaluateur (natif seulement).
// ----------------------------------------------
// Le calcul se fait côté serveur : on poste le formulaire comme le ferait la page,
// on reçoit la page re-rendue, et on relit la valeur du champ `display`.
// Le cookie de session est conservé (historique + mode angulaire côté serveur).

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Configuration;
use crate::pilote::{Formulaire, TypeCalculatrice};

/// Id du champ d’affichage dans la page rendue.
const ID_CHAMP: &str = "display";

#[derive(Debug, Error)]
pub enum ErreurServeur {
    #[error("requête: {0}")]
    Http(#[from] reqwest::Error),
    #[error("champ #display introuvable dans la page rendue")]
    ChampAbsent,
}

/// Ce qu’on retient de la page renvoyée par le serveur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRendue {
    pub valeur_champ: String,
}

impl PageRendue {
    pub fn depuis_html(html: &str) -> Result<Self, ErreurServeur> {
        let valeur = valeur_du_champ(html, ID_CHAMP).ok_or(ErreurServeur::ChampAbsent)?;
        Ok(Self {
            valeur_champ: decoder_entites(valeur),
        })
    }
}

/// Évaluateur externe : soumission de formulaire ou navigation, réponse = page entière.
pub trait Evaluateur: Send + Sync {
    fn soumettre(
        &self,
        formulaire: &Formulaire,
        calculatrice: TypeCalculatrice,
    ) -> Result<PageRendue, ErreurServeur>;

    fn naviguer(&self, route: &str) -> Result<PageRendue, ErreurServeur>;
}

pub struct ServeurHttp {
    client: reqwest::blocking::Client,
    base: String,
}

impl ServeurHttp {
    pub fn new(config: &Configuration) -> Result<Self, ErreurServeur> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .timeout(config.delai_requete())
            .build()?;
        Ok(Self {
            client,
            base: config.url_serveur.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base, route)
    }
}

impl Evaluateur for ServeurHttp {
    fn soumettre(
        &self,
        formulaire: &Formulaire,
        calculatrice: TypeCalculatrice,
    ) -> Result<PageRendue, ErreurServeur> {
        let mut champs = vec![("expression", formulaire.expression.as_str())];
        if let Some(origine) = &formulaire.expression_originale {
            champs.push(("original_expression", origine.as_str()));
        }

        let url = self.url(calculatrice.route());
        info!(%url, expression = %formulaire.expression, "POST formulaire");
        let html = self
            .client
            .post(&url)
            .form(&champs)
            .send()?
            .error_for_status()?
            .text()?;
        PageRendue::depuis_html(&html)
    }

    fn naviguer(&self, route: &str) -> Result<PageRendue, ErreurServeur> {
        let url = self.url(route);
        info!(%url, "GET");
        // Les routes de bascule redirigent vers la page : reqwest suit la redirection.
        let html = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .text()?;
        PageRendue::depuis_html(&html).inspect_err(|e| warn!(%e, "page sans champ"))
    }
}

/* ------------------------ Lecture minimale du HTML rendu ------------------------ */

/// Valeur brute de `<input id="…" value="…">` (None si le champ n’existe pas).
/// Un champ sans attribut `value` vaut "".
fn valeur_du_champ<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let mut reste = html;
    while let Some(debut) = reste.find("<input") {
        let balise = &reste[debut..];
        let fin = balise.find('>')?;
        let balise = &balise[..fin];
        if attribut(balise, "id") == Some(id) {
            return Some(attribut(balise, "value").unwrap_or(""));
        }
        reste = &reste[debut + fin..];
    }
    None
}

/// Attribut d’une balise ouvrante : entre guillemets (simples ou doubles) ou nu (`id=display`).
fn attribut<'a>(balise: &'a str, nom: &str) -> Option<&'a str> {
    let motif = format!("{nom}=");
    let mut depuis = 0;
    while let Some(pos) = balise[depuis..].find(&motif) {
        let pos = depuis + pos;
        depuis = pos + motif.len();

        // "data-id=" ne doit pas matcher "id=".
        let precedent = balise[..pos].chars().next_back();
        if !precedent.is_some_and(char::is_whitespace) {
            continue;
        }

        let apres = &balise[depuis..];
        return match apres.chars().next() {
            Some(g @ ('"' | '\'')) => {
                let contenu = &apres[1..];
                contenu.find(g).map(|fin| &contenu[..fin])
            }
            // Valeur nue : jusqu’au prochain blanc.
            _ => Some(apres.split(char::is_whitespace).next().unwrap_or("")),
        };
    }
    None
}

/// Entités nommées courantes et références numériques (`&#39;`, `&#x27;`).
/// Une entité inconnue est laissée telle quelle.
fn decoder_entites(s: &str) -> String {
    let mut sortie = String::with_capacity(s.len());
    let mut reste = s;
    while let Some(debut) = reste.find('&') {
        sortie.push_str(&reste[..debut]);
        reste = &reste[debut..];
        let decode = reste
            .find(';')
            .filter(|&fin| fin <= 10)
            .and_then(|fin| entite(&reste[1..fin]).map(|c| (c, fin)));
        match decode {
            Some((c, fin)) => {
                sortie.push(c);
                reste = &reste[fin + 1..];
            }
            None => {
                sortie.push('&');
                reste = &reste[1..];
            }
        }
    }
    sortie.push_str(reste);
    sortie
}

fn entite(nom: &str) -> Option<char> {
    match nom {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = match nom.strip_prefix('#')? {
                hex if hex.starts_with(['x', 'X']) => u32::from_str_radix(&hex[1..], 16).ok()?,
                dec => dec.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_resultat() {
        let html = r#"<form method="post">
            <input type="text" name="expression" id="display" value="42" readonly>
        </form>"#;
        assert_eq!(
            PageRendue::depuis_html(html).unwrap().valeur_champ,
            "42".to_string()
        );
    }

    #[test]
    fn page_erreur_avec_entites() {
        let html = r#"<input data-id="x" value="non"><input id='display' value="Erro: unsupported operand type(s) for &amp;: &#39;int&#39;">"#;
        assert_eq!(
            PageRendue::depuis_html(html).unwrap().valeur_champ,
            "Erro: unsupported operand type(s) for &: 'int'"
        );
    }

    #[test]
    fn champ_vide_ou_absent() {
        assert_eq!(
            PageRendue::depuis_html(r#"<input id="display" readonly>"#)
                .unwrap()
                .valeur_champ,
            ""
        );
        assert!(matches!(
            PageRendue::depuis_html("<html><body></body></html>"),
            Err(ErreurServeur::ChampAbsent)
        ));
    }

    #[test]
    fn attribut_prefixe_ignore() {
        assert_eq!(attribut(r#"<input data-id="a" id="b""#, "id"), Some("b"));
    }

    #[test]
    fn attributs_sans_guillemets() {
        let html = "<input type=text id=display value=12 readonly>";
        assert_eq!(PageRendue::depuis_html(html).unwrap().valeur_champ, "12");
        assert_eq!(attribut("<input id=display", "id"), Some("display"));
    }

    #[test]
    fn entites_numeriques_et_inconnues() {
        assert_eq!(decoder_entites("&#x3C;x&#62; &pi; a&b"), "<x> &pi; a&b");
        assert_eq!(decoder_entites("&amp;lt;"), "&lt;");
    }
}
