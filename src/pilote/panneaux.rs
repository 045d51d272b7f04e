// src/pilote/panneaux.rs
//
// Menu déroulant + panneau d’historique : simple état ouvert/fermé.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Panneau {
    ouvert: bool,
}

impl Panneau {
    pub fn est_ouvert(self) -> bool {
        self.ouvert
    }

    pub fn basculer(&mut self) {
        self.ouvert = !self.ouvert;
    }

    pub fn fermer(&mut self) {
        self.ouvert = false;
    }
}

/// Où est tombé un clic sur la page (test d’appartenance fait par la vue).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cible {
    /// Dans le conteneur du menu (bouton compris).
    pub dans_menu: bool,
    pub dans_historique: bool,
    pub sur_bouton_historique: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Panneaux {
    pub menu: Panneau,
    pub historique: Panneau,
}

impl Panneaux {
    /// Clic quelque part dans la page : ferme ce qui est “dehors”.
    pub fn clic_document(&mut self, cible: Cible) {
        if !cible.dans_menu {
            self.menu.fermer();
        }
        if self.historique.est_ouvert() && !cible.dans_historique && !cible.sur_bouton_historique
        {
            self.historique.fermer();
        }
    }
}
