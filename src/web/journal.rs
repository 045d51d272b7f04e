// src/web/journal.rs
//
// Journal (wasm32) : les événements `tracing` vont dans la console du navigateur.
// Une ligne formatée par événement, envoyée au niveau console correspondant.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// À appeler une fois, au chargement de la page.
pub fn installer() {
    let resultat = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_writer(ConsoleNavigateur)
        .try_init();
    if let Err(e) = resultat {
        console::warn_1(&JsValue::from_str(&format!("journal non installé : {e}")));
    }
}

struct ConsoleNavigateur;

impl<'a> MakeWriter<'a> for ConsoleNavigateur {
    type Writer = LigneConsole;

    fn make_writer(&'a self) -> Self::Writer {
        LigneConsole::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        LigneConsole::new(*meta.level())
    }
}

/// Tampon d’une ligne, vidé dans la console à la destruction.
struct LigneConsole {
    niveau: Level,
    tampon: Vec<u8>,
}

impl LigneConsole {
    fn new(niveau: Level) -> Self {
        Self {
            niveau,
            tampon: Vec::new(),
        }
    }
}

impl io::Write for LigneConsole {
    fn write(&mut self, octets: &[u8]) -> io::Result<usize> {
        self.tampon.extend_from_slice(octets);
        Ok(octets.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LigneConsole {
    fn drop(&mut self) {
        if self.tampon.is_empty() {
            return;
        }
        let ligne = String::from_utf8_lossy(&self.tampon);
        let msg = JsValue::from_str(ligne.trim_end());
        match self.niveau {
            Level::ERROR => console::error_1(&msg),
            Level::WARN => console::warn_1(&msg),
            Level::INFO => console::info_1(&msg),
            _ => console::debug_1(&msg),
        }
    }
}
