//! Per-host corrections applied to a raw JSON-LD Recipe object before
//! generic field mapping.
//!
//! The table is configuration data observed from live pages; an unknown
//! host passes through untouched.

use serde_json::{Map, Value};

/// One structural fix to a Recipe object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Flatten arrays nested one level too deep (`[["a", "b"]]`).
    FlattenNested(&'static str),
    /// Move a value to the schema.org key when that key is absent.
    RenameKey {
        from: &'static str,
        to: &'static str,
    },
    /// Split a single text value into one entry per line.
    SplitLines(&'static str),
    /// Instruction steps that carry their text under another key.
    StepTextFrom(&'static str),
}

impl Correction {
    fn describe(&self) -> String {
        match self {
            Correction::FlattenNested(field) => format!("flattened nested '{field}'"),
            Correction::RenameKey { from, to } => format!("moved '{from}' to '{to}'"),
            Correction::SplitLines(field) => format!("split '{field}' into lines"),
            Correction::StepTextFrom(key) => format!("read step text from '{key}'"),
        }
    }

    /// Apply to `recipe`, returning whether anything changed.
    fn apply(&self, recipe: &mut Map<String, Value>) -> bool {
        match *self {
            Correction::FlattenNested(field) => match recipe.get_mut(field) {
                Some(Value::Array(items)) if items.iter().any(Value::is_array) => {
                    let flat = std::mem::take(items)
                        .into_iter()
                        .flat_map(|item| match item {
                            Value::Array(inner) => inner,
                            other => vec![other],
                        })
                        .collect();
                    *items = flat;
                    true
                }
                _ => false,
            },
            Correction::RenameKey { from, to } => {
                if recipe.contains_key(to) {
                    return false;
                }
                match recipe.remove(from) {
                    Some(value) => {
                        recipe.insert(to.to_string(), value);
                        true
                    }
                    None => false,
                }
            }
            Correction::SplitLines(field) => match recipe.get(field) {
                Some(Value::String(text)) if text.contains('\n') => {
                    let lines = text
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(|l| Value::String(l.to_string()))
                        .collect();
                    recipe.insert(field.to_string(), Value::Array(lines));
                    true
                }
                _ => false,
            },
            Correction::StepTextFrom(key) => {
                let Some(Value::Array(steps)) = recipe.get_mut("recipeInstructions") else {
                    return false;
                };
                let mut changed = false;
                for step in steps.iter_mut().filter_map(Value::as_object_mut) {
                    if step.contains_key("text") {
                        continue;
                    }
                    if let Some(text) = step.get(key).cloned() {
                        step.insert("text".to_string(), text);
                        changed = true;
                    }
                }
                changed
            }
        }
    }
}

/// Hostname suffix → corrections, most specific host first.
static CORRECTIONS: &[(&str, &[Correction])] = &[
    (
        "food.com",
        &[
            Correction::FlattenNested("recipeIngredient"),
            Correction::SplitLines("recipeInstructions"),
        ],
    ),
    (
        "cooking.nytimes.com",
        &[Correction::FlattenNested("recipeInstructions")],
    ),
    (
        "delish.com",
        &[Correction::RenameKey {
            from: "ingredients",
            to: "recipeIngredient",
        }],
    ),
    (
        "tasty.co",
        &[
            Correction::RenameKey {
                from: "instructions",
                to: "recipeInstructions",
            },
            Correction::StepTextFrom("description"),
        ],
    ),
    ("bonappetit.com", &[Correction::StepTextFrom("name")]),
    ("epicurious.com", &[Correction::StepTextFrom("name")]),
    (
        "bbcgoodfood.com",
        &[Correction::SplitLines("recipeInstructions")],
    ),
];

/// A normalized Recipe object and the corrections that changed it.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub recipe: Value,
    pub applied: Vec<String>,
}

fn host_matches(hostname: &str, suffix: &str) -> bool {
    hostname == suffix || hostname.ends_with(&format!(".{suffix}"))
}

pub fn corrections_for(hostname: &str) -> &'static [Correction] {
    CORRECTIONS
        .iter()
        .find(|(suffix, _)| host_matches(hostname, suffix))
        .map(|(_, corrections)| *corrections)
        .unwrap_or(&[])
}

pub fn normalize(hostname: &str, recipe: &Value) -> Normalized {
    let mut recipe = recipe.clone();
    let mut applied = Vec::new();

    if let Value::Object(map) = &mut recipe {
        for correction in corrections_for(hostname) {
            if correction.apply(map) {
                applied.push(format!("Schema correction for {hostname}: {}", correction.describe()));
            }
        }
    }

    Normalized { recipe, applied }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_host_is_passthrough() {
        let raw = json!({"@type": "Recipe", "recipeIngredient": [["a"]]});
        let normalized = normalize("example.com", &raw);
        assert_eq!(normalized.recipe, raw);
        assert!(normalized.applied.is_empty());
    }

    #[test]
    fn test_flatten_nested_ingredients() {
        let raw = json!({"recipeIngredient": [["1 cup flour", "2 eggs"], "salt"]});
        let normalized = normalize("www.food.com", &raw);
        assert_eq!(
            normalized.recipe["recipeIngredient"],
            json!(["1 cup flour", "2 eggs", "salt"])
        );
        assert_eq!(normalized.applied.len(), 1);
    }

    #[test]
    fn test_subdomain_matches_suffix() {
        assert_eq!(corrections_for("m.delish.com").len(), 1);
        assert!(corrections_for("notdelish.com").is_empty());
    }

    #[test]
    fn test_rename_key_only_when_target_missing() {
        let raw = json!({"ingredients": ["a"], "recipeIngredient": ["b"]});
        let normalized = normalize("delish.com", &raw);
        assert_eq!(normalized.recipe["recipeIngredient"], json!(["b"]));
        assert!(normalized.applied.is_empty());

        let raw = json!({"ingredients": ["a"]});
        let normalized = normalize("delish.com", &raw);
        assert_eq!(normalized.recipe["recipeIngredient"], json!(["a"]));
    }

    #[test]
    fn test_step_text_from_other_key() {
        let raw = json!({"recipeInstructions": [
            {"@type": "HowToStep", "name": "Chop the onions finely"},
            {"@type": "HowToStep", "text": "Fry them", "name": "ignored"}
        ]});
        let normalized = normalize("bonappetit.com", &raw);
        assert_eq!(
            normalized.recipe["recipeInstructions"][0]["text"],
            "Chop the onions finely"
        );
        assert_eq!(normalized.recipe["recipeInstructions"][1]["text"], "Fry them");
    }

    #[test]
    fn test_split_lines() {
        let raw = json!({"recipeInstructions": "Mix the batter.\n\nBake for an hour."});
        let normalized = normalize("bbcgoodfood.com", &raw);
        assert_eq!(
            normalized.recipe["recipeInstructions"],
            json!(["Mix the batter.", "Bake for an hour."])
        );
    }
}
