use super::normalize::normalize;
use super::selectors::{self, SelectorSet, GENERIC_SELECTORS};
use super::{Extraction, Extractor, ParsingContext};
use crate::error::ExtractError;
use crate::model::{ExtractionMethod, PartialRecipe};
use crate::parsers::{
    clean_instruction, clean_text, extract_number, is_meaningful_step, non_empty, parse_duration,
};
use log::debug;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

/// Generic schema.org JSON-LD strategy. Handles every host and falls back to
/// the generic selector set when no usable structured data exists.
pub struct JsonLdExtractor;

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::JsonLd
    }

    fn can_handle(&self, _hostname: &str) -> bool {
        true
    }

    fn try_extract(&self, context: &ParsingContext) -> Result<Extraction, ExtractError> {
        Ok(extract_with_fallback(
            context,
            &GENERIC_SELECTORS,
            ExtractionMethod::CssSelectors,
        ))
    }
}

/// Structured data first; selectors fill in when it yields no title.
/// `fallback` is the method reported when selectors carried the result.
pub(super) fn extract_with_fallback(
    context: &ParsingContext,
    selector_set: &SelectorSet,
    fallback: ExtractionMethod,
) -> Extraction {
    let StructuredData { recipe, mut issues } = extract_structured(context);

    match recipe {
        Some(mut recipe) if recipe.has_title() => {
            if recipe.ingredients.is_empty() || recipe.instructions.is_empty() {
                let markup = selectors::extract_with(&context.document, selector_set, &context.url);
                let mut filled = Vec::new();
                if recipe.ingredients.is_empty() && !markup.ingredients.is_empty() {
                    filled.push("ingredients");
                }
                if recipe.instructions.is_empty() && !markup.instructions.is_empty() {
                    filled.push("instructions");
                }
                if !filled.is_empty() {
                    recipe.fill_missing_from(&markup);
                    issues.push(format!(
                        "Structured data incomplete; {} taken from page markup",
                        filled.join(" and ")
                    ));
                }
            }
            Extraction {
                recipe,
                method: ExtractionMethod::JsonLd,
                issues,
            }
        }
        structured => {
            issues.push("No usable JSON-LD recipe; using markup selectors".to_string());
            let mut recipe = selectors::extract_with(&context.document, selector_set, &context.url);
            if let Some(partial) = structured {
                recipe.fill_missing_from(&partial);
            }
            Extraction {
                recipe,
                method: fallback,
                issues,
            }
        }
    }
}

/// Output of the structured-data pass.
#[derive(Debug, Default)]
pub(super) struct StructuredData {
    pub recipe: Option<PartialRecipe>,
    pub issues: Vec<String>,
}

/// Find the first titled Recipe object across all JSON-LD blocks, normalize
/// it for the host and map it onto a [`PartialRecipe`]. The first untitled
/// Recipe is kept when no block has a titled one.
pub(super) fn extract_structured(context: &ParsingContext) -> StructuredData {
    let mut data = StructuredData::default();
    let mut untitled: Option<(PartialRecipe, Vec<String>)> = None;
    let blocks = json_ld_blocks(&context.document);
    debug!("JsonLdExtractor: Found {} JSON-LD script tags", blocks.len());

    for (index, raw) in blocks.iter().enumerate() {
        let json = match parse_block(raw) {
            Ok(json) => json,
            Err(e) => {
                debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                data.issues.push(format!("Skipped JSON-LD block {index}: {e}"));
                continue;
            }
        };

        let Some(found) = find_recipe(&json, 0, context.max_json_depth) else {
            debug!("JsonLdExtractor: No recipe found in JSON-LD {}", index);
            continue;
        };

        let normalized = normalize(&context.hostname, found);
        let Value::Object(object) = &normalized.recipe else {
            continue;
        };
        let mut issues = normalized.applied.clone();
        let recipe = map_recipe(object, &context.url, &mut issues);
        if recipe.has_title() {
            data.issues.extend(issues);
            data.recipe = Some(recipe);
            return data;
        }
        debug!("JsonLdExtractor: Recipe in JSON-LD {} has no name", index);
        untitled.get_or_insert((recipe, issues));
    }

    if let Some((recipe, issues)) = untitled {
        data.issues.extend(issues);
        data.recipe = Some(recipe);
    }
    data
}

fn json_ld_blocks(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("script[type]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter(|script| {
            script
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().to_ascii_lowercase().contains("ld+json"))
        })
        .map(|script| script.text().collect::<String>())
        .collect()
}

/// Parse a block as-is, retrying once on a sanitized copy.
fn parse_block(raw: &str) -> Result<Value, ExtractError> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(json) => Ok(json),
        Err(_) => Ok(serde_json::from_str::<Value>(&sanitize_json(raw))?),
    }
}

/// Repair common hand-written JSON mistakes: comment and CDATA wrappers,
/// trailing commas, and raw control characters inside strings.
fn sanitize_json(json_str: &str) -> String {
    let mut trimmed = json_str.trim();
    for (open, close) in [("<!--", "-->"), ("//<![CDATA[", "//]]>"), ("<![CDATA[", "]]>")] {
        trimmed = trimmed.trim_start_matches(open).trim_end_matches(close).trim();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut cleaned = String::with_capacity(trimmed.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    cleaned.push(c);
                }
                '\\' => {
                    escaped = true;
                    cleaned.push(c);
                }
                '"' => {
                    in_string = false;
                    cleaned.push(c);
                }
                '\n' => cleaned.push_str("\\n"),
                '\t' => cleaned.push_str("\\t"),
                c if c.is_control() => {}
                c => cleaned.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                cleaned.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some(']') | Some('}') | None) {
                    cleaned.push(c);
                }
            }
            _ => cleaned.push(c),
        }
    }

    debug!("Sanitized JSON: {}", cleaned);
    cleaned
}

fn is_recipe_type(value: &Value) -> bool {
    fn names_recipe(t: &str) -> bool {
        let t = t.rsplit(['/', ':']).next().unwrap_or(t);
        t.eq_ignore_ascii_case("recipe")
    }

    match value.get("@type") {
        Some(Value::String(t)) => names_recipe(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(names_recipe),
        _ => false,
    }
}

/// Depth-bounded search for a Recipe-typed object.
fn find_recipe(value: &Value, depth: usize, max_depth: usize) -> Option<&Value> {
    if depth > max_depth {
        return None;
    }
    match value {
        Value::Object(object) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            if let Some(found) = object
                .get("@graph")
                .and_then(|graph| find_recipe(graph, depth + 1, max_depth))
            {
                return Some(found);
            }
            object
                .iter()
                .filter(|(key, _)| key.as_str() != "@graph")
                .find_map(|(_, nested)| find_recipe(nested, depth + 1, max_depth))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|item| find_recipe(item, depth + 1, max_depth)),
        _ => None,
    }
}

/// Keep going when a single field fails to map.
fn recover<T>(issues: &mut Vec<String>, result: Result<Option<T>, ExtractError>) -> Option<T> {
    result.unwrap_or_else(|e| {
        debug!("JsonLdExtractor: {}", e);
        issues.push(e.to_string());
        None
    })
}

fn map_recipe(recipe: &Map<String, Value>, url: &str, issues: &mut Vec<String>) -> PartialRecipe {
    let title = recover(issues, text_field(recipe, "name", "title"));
    let description = recover(issues, text_field(recipe, "description", "description"));
    let image = recover(issues, image_field(recipe.get("image"), url));
    let prep_time = recover(issues, duration_field(recipe, "prepTime"));
    let cook_time = recover(issues, duration_field(recipe, "cookTime"));
    let total_time = recover(issues, duration_field(recipe, "totalTime"));
    let servings = recover(issues, servings_field(recipe));

    PartialRecipe {
        title,
        description,
        image,
        prep_time,
        cook_time,
        total_time,
        servings,
        difficulty: None,
        ingredients: ingredients_field(recipe),
        instructions: instructions_field(recipe),
        tags: tags_field(recipe),
        source_url: url.to_string(),
    }
}

/// String-ish value: plain strings, `{text|name|@value}` objects, numbers,
/// or the first usable entry of an array.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(object) => ["text", "name", "@value"]
            .iter()
            .find_map(|key| object.get(*key).and_then(value_text))
            .or_else(|| non_empty(&value.to_string())),
        Value::Array(items) => items.iter().find_map(value_text),
        Value::Bool(_) | Value::Null => None,
    }
}

fn text_field(
    recipe: &Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<Option<String>, ExtractError> {
    match recipe.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(_)) => Err(ExtractError::field(field, format!("'{key}' is a boolean"))),
        Some(value) => Ok(value_text(value)),
    }
}

fn image_field(value: Option<&Value>, url: &str) -> Result<Option<String>, ExtractError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(src)) => Ok(selectors::resolve_url(url, src)),
        Some(Value::Object(object)) => Ok(["url", "contentUrl", "@id"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .and_then(|src| selectors::resolve_url(url, src))),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .find_map(|item| image_field(Some(item), url).ok().flatten())),
        Some(other) => Err(ExtractError::field(
            "image",
            format!("unsupported value {other}"),
        )),
    }
}

fn duration_field(
    recipe: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ExtractError> {
    match recipe.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => match parse_duration(text) {
            None if !text.trim().is_empty() => Err(ExtractError::field(
                key,
                format!("unusable duration '{}'", text.trim()),
            )),
            parsed => Ok(parsed),
        },
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .find_map(parse_duration)),
        Some(other) => Err(ExtractError::field(key, format!("unsupported value {other}"))),
    }
}

fn servings_field(recipe: &Map<String, Value>) -> Result<Option<f64>, ExtractError> {
    fn number_in(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => extract_number(s),
            Value::Array(items) => items.iter().find_map(number_in),
            Value::Object(object) => object.get("value").and_then(number_in),
            Value::Bool(_) | Value::Null => None,
        }
    }

    match recipe.get("recipeYield").or_else(|| recipe.get("yield")) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(_)) => Err(ExtractError::field("servings", "yield is a boolean")),
        Some(value) => Ok(number_in(value)),
    }
}

fn ingredient_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(object) if object.contains_key("amount") => {
            let name = object.get("name").and_then(value_text)?;
            match object.get("amount").and_then(value_text) {
                Some(amount) => Some(format!("{amount} {name}")),
                None => Some(name),
            }
        }
        other => value_text(other),
    }
}

fn ingredient_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(ingredient_text).collect(),
        Value::String(text) => text.lines().filter_map(non_empty).collect(),
        other => ingredient_text(other).into_iter().collect(),
    }
}

fn ingredients_field(recipe: &Map<String, Value>) -> Vec<String> {
    let primary = recipe
        .get("recipeIngredient")
        .map(ingredient_list)
        .unwrap_or_default();
    if !primary.is_empty() {
        return primary;
    }

    // last resort: any sibling key that talks about ingredients
    recipe
        .iter()
        .filter(|(key, _)| {
            key.as_str() != "recipeIngredient" && key.to_ascii_lowercase().contains("ingredient")
        })
        .map(|(_, value)| ingredient_list(value))
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

/// The schema.org shapes `recipeInstructions` shows up in.
enum InstructionShape<'a> {
    Text(&'a str),
    List(&'a [Value]),
    Step(&'a Map<String, Value>),
    Section(&'a Map<String, Value>),
    ItemList(&'a Map<String, Value>),
    Other(&'a Map<String, Value>),
    Ignored,
}

impl<'a> From<&'a Value> for InstructionShape<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(text) => InstructionShape::Text(text),
            Value::Array(items) => InstructionShape::List(items),
            Value::Object(object) => {
                let typed = |name: &str| match object.get("@type") {
                    Some(Value::String(t)) => t.eq_ignore_ascii_case(name),
                    Some(Value::Array(types)) => types
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|t| t.eq_ignore_ascii_case(name)),
                    _ => false,
                };
                if typed("HowToSection") {
                    InstructionShape::Section(object)
                } else if typed("ItemList") {
                    InstructionShape::ItemList(object)
                } else if typed("HowToStep") || typed("HowToDirection") || typed("HowToTip") {
                    InstructionShape::Step(object)
                } else {
                    InstructionShape::Other(object)
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => InstructionShape::Ignored,
        }
    }
}

const MAX_INSTRUCTION_DEPTH: usize = 16;

fn nested_steps(object: &Map<String, Value>) -> Option<&Value> {
    object
        .get("itemListElement")
        .or_else(|| object.get("hasStep"))
        .or_else(|| object.get("steps"))
}

fn flatten_instructions(shape: InstructionShape, depth: usize, out: &mut Vec<String>) {
    if depth > MAX_INSTRUCTION_DEPTH {
        return;
    }
    let recurse = |value: &Value, out: &mut Vec<String>| {
        flatten_instructions(InstructionShape::from(value), depth + 1, out)
    };

    match shape {
        InstructionShape::Text(text) => {
            out.extend(text.lines().map(str::to_string));
        }
        InstructionShape::List(items) => {
            for item in items {
                recurse(item, out);
            }
        }
        InstructionShape::Step(step) => {
            if let Some(text) = ["text", "name", "description"]
                .iter()
                .find_map(|key| step.get(*key).and_then(Value::as_str))
                .filter(|t| !t.trim().is_empty())
            {
                out.push(text.to_string());
            } else if let Some(nested) = nested_steps(step) {
                recurse(nested, out);
            }
        }
        InstructionShape::Section(section) | InstructionShape::ItemList(section) => {
            if let Some(nested) = nested_steps(section) {
                recurse(nested, out);
            }
        }
        InstructionShape::Other(object) => {
            if let Some(nested) = nested_steps(object) {
                recurse(nested, out);
            } else if let Some(text) = ["text", "name", "description"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_str))
                .or_else(|| {
                    object
                        .iter()
                        .filter(|(key, _)| !key.starts_with('@') && key.as_str() != "url")
                        .find_map(|(_, value)| value.as_str())
                })
            {
                out.push(text.to_string());
            }
        }
        InstructionShape::Ignored => {}
    }
}

/// Flatten any instruction shape into cleaned, non-trivial steps.
fn instruction_steps(value: &Value) -> Vec<String> {
    let mut raw = Vec::new();
    flatten_instructions(InstructionShape::from(value), 0, &mut raw);
    raw.iter()
        .map(|step| clean_instruction(&clean_text(step)))
        .filter(|step| is_meaningful_step(step))
        .collect()
}

fn instructions_field(recipe: &Map<String, Value>) -> Vec<String> {
    ["recipeInstructions", "steps", "method", "directions", "preparation"]
        .iter()
        .filter_map(|key| recipe.get(*key))
        .map(instruction_steps)
        .find(|steps| !steps.is_empty())
        .unwrap_or_default()
}

fn tags_field(recipe: &Map<String, Value>) -> Vec<String> {
    fn collect(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(text) => {
                for tag in text.split(',').filter_map(non_empty) {
                    if !out.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                        out.push(tag);
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            other => {
                if let Some(tag) = value_text(other) {
                    collect(&Value::String(tag), out);
                }
            }
        }
    }

    let mut tags = Vec::new();
    for key in ["recipeCategory", "recipeCuisine"] {
        if let Some(value) = recipe.get(key) {
            collect(value, &mut tags);
        }
    }
    tags
}
