// src/pilote/routes.rs
//
// Bascules côté serveur : mode angulaire et type de calculatrice.
// Le client ne fait que changer l’indicateur visuel puis naviguer.

use serde::Deserialize;

pub const ROUTE_MODE_ANGLE: &str = "/toggle_angle_mode";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeAngle {
    #[default]
    Radians,
    Degres,
}

impl ModeAngle {
    pub fn basculer(self) -> Self {
        match self {
            ModeAngle::Radians => ModeAngle::Degres,
            ModeAngle::Degres => ModeAngle::Radians,
        }
    }

    pub fn etiquette(self) -> &'static str {
        match self {
            ModeAngle::Radians => "RAD",
            ModeAngle::Degres => "DEG",
        }
    }

    /// Valeur rendue par le serveur ("rad" / "deg").
    pub fn depuis_serveur(s: &str) -> Option<Self> {
        match s.trim() {
            "rad" => Some(ModeAngle::Radians),
            "deg" => Some(ModeAngle::Degres),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCalculatrice {
    #[default]
    Standard,
    Quaternions,
    Coquaternions,
}

impl TypeCalculatrice {
    pub const TOUS: [TypeCalculatrice; 3] = [
        TypeCalculatrice::Standard,
        TypeCalculatrice::Quaternions,
        TypeCalculatrice::Coquaternions,
    ];

    /// Page (GET) et cible du formulaire (POST).
    pub fn route(self) -> &'static str {
        match self {
            TypeCalculatrice::Standard => "/",
            TypeCalculatrice::Quaternions => "/quaternions",
            TypeCalculatrice::Coquaternions => "/coquaternions",
        }
    }

    pub fn route_effacer_historique(self) -> &'static str {
        match self {
            TypeCalculatrice::Standard => "/clear_history/standard",
            TypeCalculatrice::Quaternions => "/clear_history/quaternion",
            TypeCalculatrice::Coquaternions => "/clear_history/coquaternion",
        }
    }

    pub fn nom(self) -> &'static str {
        match self {
            TypeCalculatrice::Standard => "Standard",
            TypeCalculatrice::Quaternions => "Quaterniões",
            TypeCalculatrice::Coquaternions => "Coquaterniões",
        }
    }

    /// Seule la calculatrice standard connaît le mode angulaire.
    pub fn a_mode_angle(self) -> bool {
        self == TypeCalculatrice::Standard
    }

    /// Type déduit du chemin de la page courante (côté web).
    pub fn depuis_chemin(chemin: &str) -> Self {
        match chemin.trim_end_matches('/') {
            "/quaternions" => TypeCalculatrice::Quaternions,
            "/coquaternions" => TypeCalculatrice::Coquaternions,
            _ => TypeCalculatrice::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_angle_aller_retour() {
        assert_eq!(ModeAngle::Radians.basculer(), ModeAngle::Degres);
        assert_eq!(ModeAngle::Radians.basculer().basculer(), ModeAngle::Radians);
        assert_eq!(ModeAngle::depuis_serveur("deg"), Some(ModeAngle::Degres));
        assert_eq!(ModeAngle::depuis_serveur("grad"), None);
    }

    #[test]
    fn routes_par_type() {
        assert_eq!(TypeCalculatrice::Standard.route(), "/");
        assert_eq!(
            TypeCalculatrice::Quaternions.route_effacer_historique(),
            "/clear_history/quaternion"
        );
        assert_eq!(
            TypeCalculatrice::depuis_chemin("/coquaternions/"),
            TypeCalculatrice::Coquaternions
        );
        assert_eq!(TypeCalculatrice::depuis_chemin("/"), TypeCalculatrice::Standard);
    }
}
