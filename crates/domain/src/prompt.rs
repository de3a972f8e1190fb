//! Prompt assembly from cinematic category selections.
//!
//! A prompt is built from one fragment per [`Category`], joined in
//! [`Category::ALL`] order, optionally prefixed by a freeform scene description.
//! A curated inspiration prompt replaces the fragments entirely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Separator between technical fragments.
const FRAGMENT_SEPARATOR: &str = ", ";

/// A cinematic choice axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Equipment,
    Movement,
    Lighting,
    Palette,
    Composition,
}

impl Category {
    /// Every category, in the order fragments appear in a prompt.
    pub const ALL: [Category; 5] = [
        Category::Equipment,
        Category::Movement,
        Category::Lighting,
        Category::Palette,
        Category::Composition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Equipment => "equipment",
            Category::Movement => "movement",
            Category::Lighting => "lighting",
            Category::Palette => "palette",
            Category::Composition => "composition",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equipment" => Ok(Category::Equipment),
            "movement" => Ok(Category::Movement),
            "lighting" => Ok(Category::Lighting),
            "palette" => Ok(Category::Palette),
            "composition" => Ok(Category::Composition),
            other => Err(DomainError::parse(format!("Unknown category: {other}"))),
        }
    }
}

/// Label and prompt text for one option of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub id: &'static str,
    pub label: &'static str,
    pub text: &'static str,
}

const fn fragment(id: &'static str, label: &'static str, text: &'static str) -> Fragment {
    Fragment { id, label, text }
}

const EQUIPMENT: &[Fragment] = &[
    fragment("arri_pro", "ARRI Professional", "shot on ARRI Alexa Mini LF with cinema-grade clarity"),
    fragment("vintage_film", "Vintage Film", "shot on vintage 16mm film with warm analog grain"),
    fragment("iphone", "iPhone", "captured on iPhone 15 Pro with clean digital detail"),
    fragment("security_cam", "Security Cam", "CCTV surveillance aesthetic with digital noise"),
    fragment("red_cinema", "RED Cinema", "shot on RED Cinema camera with high dynamic range"),
    fragment("film_noir", "Film Noir", "classic black & white film noir aesthetic with high contrast"),
    fragment("drone_cam", "Drone Cam", "aerial cinematography with wide perspectives and smooth movement"),
    fragment("webcam", "Webcam", "low-fi digital quality with intimate, authentic feel"),
];

const MOVEMENT: &[Fragment] = &[
    fragment("static", "Static", "locked-off static camera with zero movement"),
    fragment("dolly", "Dolly", "smooth dolly tracking shot"),
    fragment("handheld", "Handheld", "natural handheld motion with subtle shake"),
    fragment("orbit", "Orbit", "orbiting camera move around the subject"),
    fragment("push_in", "Push In", "slow push-in movement toward the subject for emphasis"),
    fragment("pull_back", "Pull Back", "reveal shot pulling back to show context and scale"),
    fragment("tilt_pan", "Tilt & Pan", "simple camera tilt and pan for dynamic framing"),
    fragment("whip_pan", "Whip Pan", "fast horizontal whip pan for energy and transition"),
];

const LIGHTING: &[Fragment] = &[
    fragment("natural", "Natural", "soft natural daylight with gentle shadows"),
    fragment("dramatic", "Dramatic", "high contrast dramatic light with deep shadows"),
    fragment("soft", "Soft", "even soft studio lighting with minimal shadows"),
    fragment("neon", "Neon", "vibrant neon lighting with colored glow"),
    fragment("golden_hour", "Golden Hour", "warm golden hour lighting with magical quality"),
    fragment("harsh_sun", "Harsh Sun", "harsh direct sunlight with strong shadows and contrast"),
    fragment("candlelight", "Candlelight", "warm flickering candlelight with intimate atmosphere"),
    fragment("moonlight", "Moonlight", "cool moonlight with blue tones and low-light aesthetic"),
];

const PALETTE: &[Fragment] = &[
    fragment("cool_blues", "Cool Blues", "cool blue color palette with cinematic grade"),
    fragment("warm_pastels", "Warm Pastels", "warm pastel palette with gentle saturation"),
    fragment("black_white", "Black & White", "black and white monochrome with high contrast"),
    fragment("saturated", "Saturated", "bold saturated colors with vibrant look"),
    fragment("sepia_tone", "Sepia Tone", "vintage sepia tone with nostalgic brown monochrome"),
    fragment("teal_orange", "Teal & Orange", "modern teal and orange color grade with blockbuster look"),
    fragment("muted_earth", "Muted Earth", "desaturated earth tones with organic natural feel"),
    fragment("high_contrast", "High Contrast", "high contrast palette with punchy blacks and whites"),
];

const COMPOSITION: &[Fragment] = &[
    fragment("close_up", "Close-up", "intimate close-up framing with shallow depth"),
    fragment("medium", "Medium", "balanced medium shot with standard framing"),
    fragment("wide", "Wide", "wide establishing shot with environmental context"),
    fragment("aerial", "Aerial", "aerial overhead perspective with bird's-eye view"),
    fragment("dutch_angle", "Dutch Angle", "dutch angle tilted frame for tension and unease"),
    fragment("over_shoulder", "Over Shoulder", "over-the-shoulder conversation perspective with depth"),
    fragment("bird_eye", "Bird's Eye", "straight down bird's eye view for pattern and scale"),
    fragment("worm_eye", "Worm's Eye", "worm's eye view looking up for power and dominance"),
];

/// All options available for a category.
pub fn fragments(category: Category) -> &'static [Fragment] {
    match category {
        Category::Equipment => EQUIPMENT,
        Category::Movement => MOVEMENT,
        Category::Lighting => LIGHTING,
        Category::Palette => PALETTE,
        Category::Composition => COMPOSITION,
    }
}

/// Look up the fragment for a category/option pair.
pub fn lookup_fragment(category: Category, option_id: &str) -> Option<&'static Fragment> {
    fragments(category).iter().find(|f| f.id == option_id)
}

/// One chosen option id per category.
///
/// Unknown option ids are kept as given; they count as unpopulated when the
/// prompt is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeMap<Category, String>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the option for a category, replacing any previous choice.
    pub fn with(mut self, category: Category, option_id: impl Into<String>) -> Self {
        self.0.insert(category, option_id.into());
        self
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.0.get(&category).map(String::as_str)
    }

    /// Categories without a known option, in prompt order.
    pub fn missing(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| {
                self.get(*c)
                    .and_then(|id| lookup_fragment(*c, id))
                    .is_none()
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Finished prompt text. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Prompt cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Prompt {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Prompt::new(value)
    }
}

impl From<Prompt> for String {
    fn from(value: Prompt) -> Self {
        value.0
    }
}

/// Everything the user chose for one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptInput {
    pub selections: SelectionSet,
    pub scene_description: Option<String>,
    /// Curated example prompt; used verbatim instead of the fragments.
    pub inspiration: Option<String>,
}

impl PromptInput {
    pub fn from_selections(selections: SelectionSet) -> Self {
        Self {
            selections,
            ..Default::default()
        }
    }

    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene_description = Some(scene.into());
        self
    }

    pub fn with_inspiration(mut self, inspiration: impl Into<String>) -> Self {
        self.inspiration = Some(inspiration.into());
        self
    }
}

/// Pure mapping from [`PromptInput`] to [`Prompt`].
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn assemble(input: &PromptInput) -> Result<Prompt, DomainError> {
        let technical = match non_blank(input.inspiration.as_deref()) {
            Some(inspiration) => inspiration.to_string(),
            None => Self::technical_fragments(&input.selections)?,
        };

        match non_blank(input.scene_description.as_deref()) {
            Some(scene) => Prompt::new(format!("{scene}. {technical}")),
            None => Prompt::new(technical),
        }
    }

    /// Join one fragment per category in [`Category::ALL`] order.
    pub fn technical_fragments(selections: &SelectionSet) -> Result<String, DomainError> {
        let missing = selections.missing();
        if !missing.is_empty() {
            return Err(DomainError::IncompleteSelection { missing });
        }

        let parts: Vec<&str> = Category::ALL
            .iter()
            .filter_map(|c| selections.get(*c).and_then(|id| lookup_fragment(*c, id)))
            .map(|f| f.text)
            .collect();

        Ok(parts.join(FRAGMENT_SEPARATOR))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
