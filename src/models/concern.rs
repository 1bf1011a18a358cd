use crate::scraping::browser::Target;
use crate::scraping::constants::{CONCERN_CATEGORY_NAME, CONFIRM_BUTTON_ID, CONTINUE_BUTTON_ID};

/// Concerns that can be booked through the Dortmund portal
#[derive(Debug, Clone, PartialEq)]
pub enum Concern {
    /// Anmeldung (pro Person) under Einwohnermeldeangelegenheiten
    Anmeldung {
        accordion_id: &'static str,
        counter_id: &'static str,
        documents: &'static [&'static str],
    },
}

impl Concern {
    pub const ANMELDUNG: Concern = Concern::Anmeldung {
        accordion_id: "header_concerns_accordion-6276",
        counter_id: "button-plus-730",
        documents: &[
            "doclist_item_730_299131", // alle Personalausweise und Reisepässe der Anmeldenden
            "doclist_item_730_299132", // Wohnungsgeberbescheinigung
            "doclist_item_730_299139", // ggf. Heirats- und Geburtsurkunden
            "doclist_item_730_299140", // bei EU-Staatsangehörigen zusätzlich ein Lichtbild
        ],
    };

    pub fn accordion_id(&self) -> &'static str {
        match self {
            Concern::Anmeldung { accordion_id, .. } => *accordion_id,
        }
    }

    pub fn counter_id(&self) -> &'static str {
        match self {
            Concern::Anmeldung { counter_id, .. } => *counter_id,
        }
    }

    pub fn documents(&self) -> &'static [&'static str] {
        match self {
            Concern::Anmeldung { documents, .. } => *documents,
        }
    }

    /// Every control to click, in order, to get from the start page to the
    /// appointment suggestions for `persons` people.
    pub fn navigation_steps(&self, persons: u8) -> Vec<Target> {
        let mut steps = vec![
            Target::name(CONCERN_CATEGORY_NAME),
            Target::id(self.accordion_id()),
        ];
        steps.extend((0..persons).map(|_| Target::id(self.counter_id())));
        steps.push(Target::id(CONTINUE_BUTTON_ID));
        steps.extend(
            self.documents()
                .iter()
                .map(|doc| Target::css(format!("label[for='{doc}']"))),
        );
        steps.push(Target::id(CONFIRM_BUTTON_ID));
        steps
    }
}
