//! Last-resort heuristics for low-confidence results. Each pass only fills a
//! field that is still empty.

use crate::config::EngineConfig;
use crate::extractors::selectors::{clean_steps, element_text, resolve_url};
use crate::extractors::ParsingContext;
use crate::model::{ExtractionMethod, ExtractionResult, PartialRecipe};
use crate::parsers::non_empty;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static MEASUREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(cups?|tablespoons?|teaspoons?|tbsps?|tsps?|grams?|kg|ounces?|oz|pounds?|lbs?|ml|litres?|liters?|pinch|cloves?|sticks?|cans?)\b",
    )
    .expect("Invalid measurement regex")
});

static STEP_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bstep\b").expect("Invalid step regex"));

const MAX_INGREDIENT_LEN: usize = 200;
const MIN_ORDERED_STEP_LEN: usize = 20;

const IMAGE_META: &[&str] = &[
    "meta[property=\"og:image\"]",
    "meta[name=\"og:image\"]",
    "meta[name=\"twitter:image\"]",
    "meta[property=\"twitter:image\"]",
];

fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document
            .select(&selector)
            .filter(|el| !in_page_chrome(el))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Navigation, headers and footers are never recipe content.
fn in_page_chrome(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| matches!(a.value().name(), "nav" | "header" | "footer"))
}

fn keyword_ingredients(document: &Html, max_items: usize) -> Vec<String> {
    select_all(document, "li")
        .iter()
        .map(element_text)
        .filter(|t| t.chars().count() <= MAX_INGREDIENT_LEN && MEASUREMENT_REGEX.is_match(t))
        .take(max_items)
        .collect()
}

fn heuristic_instructions(document: &Html, max_items: usize) -> Vec<String> {
    let ordered: Vec<String> = select_all(document, "ol li")
        .iter()
        .map(element_text)
        .filter(|t| t.chars().count() >= MIN_ORDERED_STEP_LEN && !MEASUREMENT_REGEX.is_match(t))
        .collect();
    let candidates = if ordered.is_empty() {
        select_all(document, "li, p")
            .iter()
            .map(element_text)
            .filter(|t| STEP_WORD_REGEX.is_match(t))
            .collect()
    } else {
        ordered
    };
    clean_steps(candidates).into_iter().take(max_items).collect()
}

fn meta_title(document: &Html) -> Option<String> {
    let og = select_all(document, "meta[property=\"og:title\"]")
        .iter()
        .find_map(|el| el.value().attr("content").and_then(non_empty));
    og.or_else(|| {
        select_all(document, "title")
            .iter()
            .map(element_text)
            .find(|t| !t.is_empty())
            .and_then(|t| t.split(" | ").next().and_then(non_empty))
    })
}

fn meta_image(document: &Html, base_url: &str) -> Option<String> {
    IMAGE_META.iter().find_map(|selector| {
        select_all(document, selector)
            .iter()
            .find_map(|el| el.value().attr("content"))
            .and_then(|src| resolve_url(base_url, src))
    })
}

/// Fill still-empty fields of `best` from page-wide heuristics. Returns
/// `None` when nothing could be added.
pub fn enhance(
    context: &ParsingContext,
    best: &ExtractionResult,
    config: &EngineConfig,
) -> Option<ExtractionResult> {
    let document = &context.document;
    let mut recipe = best
        .recipe
        .clone()
        .unwrap_or_else(|| PartialRecipe::new(&context.url));
    let method = if best.recipe.is_some() {
        best.method.clone()
    } else {
        ExtractionMethod::CssSelectors
    };
    let mut confidence = best.confidence;
    let mut issues = best.issues.clone();
    let mut applied = false;

    if recipe.ingredients.is_empty() {
        let found = keyword_ingredients(document, config.max_heuristic_items);
        if !found.is_empty() {
            issues.push(format!(
                "Aggressive extraction: {} ingredients matched by measurement keywords",
                found.len()
            ));
            recipe.ingredients = found;
            confidence += config.enhancement_bonus;
            applied = true;
        }
    }

    if recipe.instructions.is_empty() {
        let found = heuristic_instructions(document, config.max_heuristic_items);
        if !found.is_empty() {
            issues.push(format!(
                "Aggressive extraction: {} instructions taken from list items",
                found.len()
            ));
            recipe.instructions = found;
            confidence += config.enhancement_bonus;
            applied = true;
        }
    }

    if !recipe.has_title() {
        if let Some(title) = meta_title(document) {
            issues.push("Title taken from page metadata".to_string());
            recipe.title = Some(title);
            confidence += config.enhancement_bonus;
            applied = true;
        }
    }

    if recipe.image.is_none() {
        if let Some(image) = meta_image(document, &context.url) {
            issues.push("Image taken from social meta tags".to_string());
            recipe.image = Some(image);
            confidence += config.image_bonus;
            applied = true;
        }
    }

    if !applied {
        return None;
    }

    debug!("Enhancement raised confidence {:.2} -> {:.2}", best.confidence, confidence);
    Some(ExtractionResult {
        recipe: Some(recipe),
        confidence: confidence.clamp(0.0, 1.0),
        method,
        issues,
    })
}
