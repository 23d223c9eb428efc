//! Prompt loader: workspace overrides over built-in definitions.

use crate::templates;
use crate::types::PromptDefinition;
use ladle_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by id.
///
/// A YAML file at `<workspace>/.ladle/prompts/<id>.yml` overrides the
/// built-in definition of the same id; otherwise the built-in is returned.
///
/// # Arguments
/// * `workspace_path` - Root workspace directory containing `.ladle/`
/// * `prompt_id` - Prompt identifier (e.g., "safety.allergen")
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(".ladle/prompts")
        .join(format!("{}.yml", prompt_id));

    if prompt_file.exists() {
        tracing::debug!("Loading prompt override from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to parse prompt YAML {:?}: {}",
                prompt_file, e
            ))
        })?;

        validate_prompt(&definition)?;

        tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
        return Ok(definition);
    }

    templates::builtin(prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt id: {}", prompt_id)))
}

/// List all available prompt ids: built-ins plus workspace overrides.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let mut prompt_ids: Vec<String> = templates::builtin_ids()
        .into_iter()
        .map(String::from)
        .collect();

    let prompts_dir = workspace_path.join(".ladle/prompts");
    if prompts_dir.exists() {
        for entry in walkdir::WalkDir::new(&prompts_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if !prompt_ids.iter().any(|id| id == stem) {
                        prompt_ids.push(stem.to_string());
                    }
                }
            }
        }
    }

    Ok(prompt_ids)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_when_no_override() {
        let dir = tempfile::tempdir().unwrap();
        let def = load_prompt(dir.path(), templates::ALLERGEN_ID).unwrap();
        assert_eq!(def.id, templates::ALLERGEN_ID);
        assert!(def.template.contains("yes"));
    }

    #[test]
    fn test_unknown_prompt_id_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_prompt(dir.path(), "does.not.exist").is_err());
    }

    #[test]
    fn test_workspace_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let prompts_dir = dir.path().join(".ladle/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join(format!("{}.yml", templates::ALLERGEN_ID)),
            "id: safety.allergen\ntitle: Custom\nvariables: [ingredient, allergen]\ntemplate: \"custom {{ingredient}} {{allergen}}\"\n",
        )
        .unwrap();

        let def = load_prompt(dir.path(), templates::ALLERGEN_ID).unwrap();
        assert_eq!(def.title, "Custom");
        assert!(def.template.starts_with("custom"));
    }

    #[test]
    fn test_invalid_override_errors() {
        let dir = tempfile::tempdir().unwrap();
        let prompts_dir = dir.path().join(".ladle/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join(format!("{}.yml", templates::DIET_ID)),
            "id: safety.diet\ntitle: Broken\ntemplate: \"\"\n",
        )
        .unwrap();

        assert!(load_prompt(dir.path(), templates::DIET_ID).is_err());
    }

    #[test]
    fn test_list_prompts_includes_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let ids = list_prompts(dir.path()).unwrap();
        for id in templates::builtin_ids() {
            assert!(ids.iter().any(|i| i == id));
        }
    }
}
