//! Director presets - complete selection sets named after a house style.

use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::prompt::{Category, SelectionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectorPreset {
    Nolan,
    Anderson,
    Kubrick,
    Lynch,
    Tarantino,
    Scorsese,
    Spielberg,
    Villeneuve,
}

impl DirectorPreset {
    pub const ALL: [DirectorPreset; 8] = [
        DirectorPreset::Nolan,
        DirectorPreset::Anderson,
        DirectorPreset::Kubrick,
        DirectorPreset::Lynch,
        DirectorPreset::Tarantino,
        DirectorPreset::Scorsese,
        DirectorPreset::Spielberg,
        DirectorPreset::Villeneuve,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DirectorPreset::Nolan => "nolan",
            DirectorPreset::Anderson => "anderson",
            DirectorPreset::Kubrick => "kubrick",
            DirectorPreset::Lynch => "lynch",
            DirectorPreset::Tarantino => "tarantino",
            DirectorPreset::Scorsese => "scorsese",
            DirectorPreset::Spielberg => "spielberg",
            DirectorPreset::Villeneuve => "villeneuve",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DirectorPreset::Nolan => "Epic, practical effects, IMAX aesthetic",
            DirectorPreset::Anderson => "Symmetrical, colorful, whimsical storytelling",
            DirectorPreset::Kubrick => "One-point perspective, meticulous, cold",
            DirectorPreset::Lynch => "Surreal, dark, mysterious",
            DirectorPreset::Tarantino => "Stylized, punchy, non-linear",
            DirectorPreset::Scorsese => "Gritty, urban, character-driven",
            DirectorPreset::Spielberg => "Wonder, warmth, sweeping camera",
            DirectorPreset::Villeneuve => "Vast, atmospheric, minimalist",
        }
    }

    /// Option ids in [`Category::ALL`] order.
    fn option_ids(&self) -> [&'static str; 5] {
        match self {
            DirectorPreset::Nolan => ["arri_pro", "dolly", "dramatic", "black_white", "wide"],
            DirectorPreset::Anderson => ["vintage_film", "static", "soft", "warm_pastels", "medium"],
            DirectorPreset::Kubrick => ["arri_pro", "static", "dramatic", "cool_blues", "wide"],
            DirectorPreset::Lynch => ["vintage_film", "handheld", "neon", "saturated", "close_up"],
            DirectorPreset::Tarantino => {
                ["red_cinema", "whip_pan", "harsh_sun", "high_contrast", "dutch_angle"]
            }
            DirectorPreset::Scorsese => {
                ["film_noir", "push_in", "candlelight", "sepia_tone", "over_shoulder"]
            }
            DirectorPreset::Spielberg => {
                ["arri_pro", "orbit", "golden_hour", "warm_pastels", "aerial"]
            }
            DirectorPreset::Villeneuve => {
                ["drone_cam", "static", "moonlight", "muted_earth", "bird_eye"]
            }
        }
    }

    pub fn selections(&self) -> SelectionSet {
        Category::ALL
            .into_iter()
            .zip(self.option_ids())
            .fold(SelectionSet::new(), |set, (category, id)| set.with(category, id))
    }
}

impl fmt::Display for DirectorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DirectorPreset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DirectorPreset::ALL
            .into_iter()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown director preset: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{PromptAssembler, PromptInput};

    #[test]
    fn every_preset_is_a_complete_selection() {
        for preset in DirectorPreset::ALL {
            let selections = preset.selections();
            assert!(selections.is_complete(), "{preset} missing {:?}", selections.missing());
            assert!(PromptAssembler::assemble(&PromptInput::from_selections(selections)).is_ok());
        }
    }

    #[test]
    fn parses_by_id() {
        assert_eq!("Kubrick".parse::<DirectorPreset>().unwrap(), DirectorPreset::Kubrick);
        assert!("bay".parse::<DirectorPreset>().is_err());
    }

    #[test]
    fn nolan_shoots_black_and_white() {
        let selections = DirectorPreset::Nolan.selections();
        assert_eq!(selections.get(Category::Palette), Some("black_white"));
        assert_eq!(selections.get(Category::Composition), Some("wide"));
    }

    #[test]
    fn ids_round_trip_and_every_preset_is_described() {
        for preset in DirectorPreset::ALL {
            assert_eq!(preset.id().parse::<DirectorPreset>().unwrap(), preset);
            assert!(!preset.description().is_empty());
        }
    }
}
