//! Closed vocabularies shared by the prompt templates and both front-ends.
//!
//! Labels are the UI-facing strings; lookups map them to the model-facing
//! phrases. Tables are ordered slices so menus render in a stable order.

/// UI language label -> model-facing language name.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("Français", "French"),
    ("English", "English"),
    ("Español", "Spanish"),
    ("Deutsch", "German"),
    ("Italiano", "Italian"),
    ("Português", "Portuguese"),
    ("Nederlands", "Dutch"),
];

pub const CATEGORIES: &[&str] = &[
    "Mode & Vêtements",
    "Électronique",
    "Maison & Décoration",
    "Beauté & Soins",
    "Sport & Loisirs",
    "Alimentation",
    "Jouets & Enfants",
    "Autre",
];

pub const TONES: &[&str] = &[
    "Professionnel",
    "Convivial",
    "Luxueux",
    "Technique",
    "Jeune & Dynamique",
    "Écologique",
];

/// Length band label -> explicit word-count range phrase.
pub const LENGTH_BANDS: &[(&str, &str)] = &[
    ("Courte (50-100 mots)", "50 to 100 words"),
    ("Moyenne (100-200 mots)", "100 to 200 words"),
    ("Longue (200-300 mots)", "200 to 300 words"),
];

pub const IMPROVEMENT_AXES: &[&str] = &[
    "Clarté et lisibilité",
    "Pouvoir de persuasion",
    "Optimisation SEO",
    "Appel à l'action",
    "Mise en avant des bénéfices",
    "Ton et style",
];

pub const DEFAULT_CATEGORY: &str = "Autre";
pub const DEFAULT_TONE: &str = "Professionnel";
pub const DEFAULT_LANGUAGE: &str = "Français";
pub const DEFAULT_TARGET_LANGUAGE: &str = "English";
pub const DEFAULT_LENGTH: &str = "Moyenne (100-200 mots)";

const FALLBACK_LANGUAGE_NAME: &str = "French";
const FALLBACK_LENGTH_PHRASE: &str = "100 to 200 words";

/// Model-facing name for a UI language label, defaulting to French when the
/// label is not in the table.
pub fn language_name(label: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(ui, _)| *ui == label)
        .map(|(_, name)| *name)
        .unwrap_or(FALLBACK_LANGUAGE_NAME)
}

/// Word-count phrase for a length band label, defaulting to the medium band.
pub fn length_phrase(label: &str) -> &'static str {
    LENGTH_BANDS
        .iter()
        .find(|(ui, _)| *ui == label)
        .map(|(_, phrase)| *phrase)
        .unwrap_or(FALLBACK_LENGTH_PHRASE)
}
