//! Prompt composition from presets, selections and free text.

use veodirector_domain::{
    Category, DirectorPreset, DomainError, Prompt, PromptAssembler, PromptInput, SelectionSet,
};

/// Raw caller input; category keys and preset ids are still strings.
#[derive(Debug, Clone, Default)]
pub struct ComposeRequest {
    pub preset: Option<String>,
    pub selections: Vec<(String, String)>,
    pub scene_description: Option<String>,
    pub inspiration: Option<String>,
}

/// Assembles a prompt, starting from a preset when one is named.
///
/// Explicit selections replace the preset's choice for their category.
#[derive(Debug, Default)]
pub struct ComposePrompt;

impl ComposePrompt {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, request: ComposeRequest) -> Result<Prompt, DomainError> {
        let base = match request.preset.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.parse::<DirectorPreset>()?.selections(),
            _ => SelectionSet::new(),
        };

        let selections = request
            .selections
            .into_iter()
            .try_fold(base, |set, (key, option)| {
                let category: Category = key.parse()?;
                Ok::<_, DomainError>(set.with(category, option))
            })?;

        let input = PromptInput {
            selections,
            scene_description: request.scene_description,
            inspiration: request.inspiration,
        };

        PromptAssembler::assemble(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_selection() -> Vec<(String, String)> {
        [
            ("equipment", "arri_pro"),
            ("movement", "dolly"),
            ("lighting", "golden_hour"),
            ("palette", "teal_orange"),
            ("composition", "wide"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn scene_leads_the_prompt() {
        let prompt = ComposePrompt::new()
            .execute(ComposeRequest {
                selections: full_selection(),
                scene_description: Some("A lighthouse at dawn".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert!(prompt.as_str().starts_with("A lighthouse at dawn. "));
    }

    #[test]
    fn preset_fills_every_category() {
        let prompt = ComposePrompt::new()
            .execute(ComposeRequest {
                preset: Some("nolan".to_string()),
                ..Default::default()
            })
            .unwrap();

        let expected = PromptAssembler::assemble(&PromptInput::from_selections(
            DirectorPreset::Nolan.selections(),
        ))
        .unwrap();
        assert_eq!(prompt, expected);
    }

    #[test]
    fn explicit_selection_overrides_preset() {
        let with_override = ComposePrompt::new()
            .execute(ComposeRequest {
                preset: Some("nolan".to_string()),
                selections: vec![("palette".to_string(), "teal_orange".to_string())],
                ..Default::default()
            })
            .unwrap();
        let plain = ComposePrompt::new()
            .execute(ComposeRequest {
                preset: Some("nolan".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_ne!(with_override, plain);
    }

    #[test]
    fn incomplete_selection_lists_missing_categories() {
        let err = ComposePrompt::new()
            .execute(ComposeRequest {
                selections: vec![("equipment".to_string(), "arri_pro".to_string())],
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::IncompleteSelection {
                missing: vec![
                    Category::Movement,
                    Category::Lighting,
                    Category::Palette,
                    Category::Composition
                ]
            }
        );
    }

    #[test]
    fn unknown_category_or_preset_is_a_parse_error() {
        let compose = ComposePrompt::new();
        assert!(matches!(
            compose.execute(ComposeRequest {
                selections: vec![("lens".to_string(), "35mm".to_string())],
                ..Default::default()
            }),
            Err(DomainError::Parse(_))
        ));
        assert!(matches!(
            compose.execute(ComposeRequest {
                preset: Some("bay".to_string()),
                ..Default::default()
            }),
            Err(DomainError::Parse(_))
        ));
    }
}
