//! Ordered-selector markup extraction shared by the site-specific and
//! generic strategies.

use crate::model::PartialRecipe;
use crate::parsers::{
    clean_instruction, clean_text, extract_number, extract_time, is_meaningful_step,
};
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// Candidate selectors per field, most specific first. The first selector
/// producing non-empty output wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorSet {
    pub title: &'static [&'static str],
    pub description: &'static [&'static str],
    pub image: &'static [&'static str],
    pub ingredients: &'static [&'static str],
    pub instructions: &'static [&'static str],
    pub prep_time: &'static [&'static str],
    pub cook_time: &'static [&'static str],
    pub total_time: &'static [&'static str],
    pub servings: &'static [&'static str],
    pub difficulty: &'static [&'static str],
    pub tags: &'static [&'static str],
}

/// Attributes tried, in order, on the first matching image element.
pub const IMAGE_ATTRIBUTES: &[&str] = &[
    "src",
    "data-src",
    "data-lazy-src",
    "data-original",
    "data-srcset",
    "srcset",
    "content",
    "href",
];

/// Widely shared recipe markup conventions, for hosts nobody tuned.
pub const GENERIC_SELECTORS: SelectorSet = SelectorSet {
    title: &[
        ".wprm-recipe-name",
        ".tasty-recipes-title",
        ".mv-create-title",
        ".recipe-title",
        ".recipe-name",
        "[itemprop=\"name\"]",
        "h1",
    ],
    description: &[
        ".wprm-recipe-summary",
        ".tasty-recipes-description",
        ".recipe-summary",
        ".recipe-description",
        "[itemprop=\"description\"]",
    ],
    image: &[
        ".wprm-recipe-image img",
        ".tasty-recipes-image img",
        ".recipe-image img",
        "[itemprop=\"image\"]",
        "img.recipe-image",
    ],
    ingredients: &[
        ".wprm-recipe-ingredient",
        ".tasty-recipes-ingredients li",
        ".mv-create-ingredients li",
        "[itemprop=\"recipeIngredient\"]",
        "[itemprop=\"ingredients\"]",
        ".recipe-ingredients li",
        ".ingredients li",
        ".ingredient",
    ],
    instructions: &[
        ".wprm-recipe-instruction-text",
        ".tasty-recipes-instructions li",
        ".mv-create-instructions li",
        "[itemprop=\"recipeInstructions\"]",
        ".recipe-instructions li",
        ".instructions li",
        ".recipe-directions li",
        ".directions li",
        ".instruction",
    ],
    prep_time: &[
        ".wprm-recipe-prep_time-container .wprm-recipe-time",
        ".tasty-recipes-prep-time",
        "[itemprop=\"prepTime\"]",
        ".prep-time",
    ],
    cook_time: &[
        ".wprm-recipe-cook_time-container .wprm-recipe-time",
        ".tasty-recipes-cook-time",
        "[itemprop=\"cookTime\"]",
        ".cook-time",
    ],
    total_time: &[
        ".wprm-recipe-total_time-container .wprm-recipe-time",
        ".tasty-recipes-total-time",
        "[itemprop=\"totalTime\"]",
        ".total-time",
    ],
    servings: &[
        ".wprm-recipe-servings",
        ".tasty-recipes-yield",
        "[itemprop=\"recipeYield\"]",
        ".recipe-yield",
        ".servings",
    ],
    difficulty: &[".recipe-difficulty", ".difficulty"],
    tags: &[
        ".wprm-recipe-course",
        ".wprm-recipe-cuisine",
        "[itemprop=\"recipeCategory\"]",
        "[itemprop=\"recipeCuisine\"]",
    ],
};

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!("Skipping invalid selector '{}': {:?}", selector, e);
            None
        }
    }
}

/// Visible text of an element, falling back to a `content` attribute
/// for `<meta>` style markup.
pub fn element_text(element: &ElementRef) -> String {
    let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
    if !text.is_empty() {
        return text;
    }
    element
        .value()
        .attr("content")
        .map(clean_text)
        .unwrap_or_default()
}

/// Text of the first element matched by the first productive selector.
pub fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|raw| {
        let selector = parse_selector(raw)?;
        document
            .select(&selector)
            .map(|el| element_text(&el))
            .find(|t| !t.is_empty())
    })
}

/// All texts matched by the first productive selector. A matched container
/// holding `li` items yields one entry per item.
pub fn list_texts(document: &Html, selectors: &[&str]) -> Vec<String> {
    let Some(li) = parse_selector("li") else {
        return Vec::new();
    };

    for raw in selectors {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        let mut items = Vec::new();
        for element in document.select(&selector) {
            let nested: Vec<String> = element
                .select(&li)
                .map(|item| element_text(&item))
                .filter(|t| !t.is_empty())
                .collect();
            if nested.is_empty() {
                let text = element_text(&element);
                if !text.is_empty() {
                    items.push(text);
                }
            } else {
                items.extend(nested);
            }
        }
        if !items.is_empty() {
            debug!("Found {} items using selector: {}", items.len(), raw);
            return items;
        }
    }
    Vec::new()
}

/// First usable image reference, resolved against `base_url`.
pub fn first_image(document: &Html, selectors: &[&str], base_url: &str) -> Option<String> {
    selectors.iter().find_map(|raw| {
        let selector = parse_selector(raw)?;
        let element = document.select(&selector).next()?;
        element_image(&element, base_url)
    })
}

/// Image reference from the first populated attribute of `element`.
pub fn element_image(element: &ElementRef, base_url: &str) -> Option<String> {
    IMAGE_ATTRIBUTES.iter().find_map(|attr| {
        let value = element.value().attr(attr)?;
        if attr.ends_with("srcset") {
            // "url 1x, url 2x": keep the first candidate
            let candidate = value.split(',').next()?.split_whitespace().next()?;
            resolve_url(base_url, candidate)
        } else {
            resolve_url(base_url, value)
        }
    })
}

/// Make `reference` absolute. Inline data URIs are not images we can use.
pub fn resolve_url(base_url: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with("data:") {
        return None;
    }
    match url::Url::parse(base_url).and_then(|base| base.join(reference)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(_) => Some(reference.to_string()),
    }
}

pub fn clean_steps(steps: impl IntoIterator<Item = String>) -> Vec<String> {
    steps
        .into_iter()
        .map(|s| clean_instruction(&s))
        .filter(|s| is_meaningful_step(s))
        .collect()
}

/// Run every field of `set` against `document`.
pub fn extract_with(document: &Html, set: &SelectorSet, source_url: &str) -> PartialRecipe {
    let mut tags: Vec<String> = Vec::new();
    for tag in set
        .tags
        .iter()
        .flat_map(|raw| list_texts(document, std::slice::from_ref(raw)))
        .flat_map(|t| t.split(',').map(str::trim).map(str::to_string).collect::<Vec<_>>())
    {
        if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }

    PartialRecipe {
        title: first_text(document, set.title),
        description: first_text(document, set.description),
        image: first_image(document, set.image, source_url),
        prep_time: first_text(document, set.prep_time).map(|t| extract_time(&t)),
        cook_time: first_text(document, set.cook_time).map(|t| extract_time(&t)),
        total_time: first_text(document, set.total_time).map(|t| extract_time(&t)),
        servings: first_text(document, set.servings).and_then(|t| extract_number(&t)),
        difficulty: first_text(document, set.difficulty),
        ingredients: list_texts(document, set.ingredients),
        instructions: clean_steps(list_texts(document, set.instructions)),
        tags,
        source_url: source_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_selector_wins() {
        let document = Html::parse_document(
            r#"<h1>Site header</h1><h2 class="recipe-title">Lemon Tart</h2>"#,
        );
        assert_eq!(
            first_text(&document, GENERIC_SELECTORS.title).as_deref(),
            Some("Lemon Tart")
        );
    }

    #[test]
    fn test_list_items_inside_container() {
        let document = Html::parse_document(
            r#"<div class="tasty-recipes-ingredients"><ul><li>1 cup rice</li><li> </li><li>2 cups water</li></ul></div>"#,
        );
        assert_eq!(
            list_texts(&document, &[".tasty-recipes-ingredients"]),
            vec!["1 cup rice", "2 cups water"]
        );
    }

    #[test]
    fn test_image_attribute_order_and_resolution() {
        let document = Html::parse_document(
            r#"<div class="recipe-image"><img data-lazy-src="/img/tart.jpg" src="data:image/gif;base64,R0lG"></div>"#,
        );
        assert_eq!(
            first_image(&document, &[".recipe-image img"], "https://example.com/recipes/tart"),
            Some("https://example.com/img/tart.jpg".to_string())
        );
    }

    #[test]
    fn test_srcset_takes_first_candidate() {
        let document = Html::parse_document(
            r#"<img class="hero" srcset="https://cdn.example.com/a.jpg 1x, https://cdn.example.com/b.jpg 2x">"#,
        );
        assert_eq!(
            first_image(&document, &["img.hero"], "https://example.com/"),
            Some("https://cdn.example.com/a.jpg".to_string())
        );
    }

    #[test]
    fn test_extract_with_generic_set() {
        let html = r#"
            <html><body>
                <h1 class="recipe-title">Pancakes</h1>
                <span class="prep-time">10 minutes</span>
                <span class="servings">Serves 4</span>
                <ul class="ingredients"><li>1 cup flour</li><li>1 egg</li></ul>
                <ol class="instructions"><li>1. Whisk everything together</li><li>Ok</li></ol>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        let recipe = extract_with(&document, &GENERIC_SELECTORS, "https://pancake.example/");

        assert_eq!(recipe.title.as_deref(), Some("Pancakes"));
        assert_eq!(recipe.prep_time.as_deref(), Some("10m"));
        assert_eq!(recipe.servings, Some(4.0));
        assert_eq!(recipe.ingredients, vec!["1 cup flour", "1 egg"]);
        assert_eq!(recipe.instructions, vec!["Whisk everything together"]);
        assert_eq!(recipe.source_url, "https://pancake.example/");
    }

    #[test]
    fn test_meta_content_fallback() {
        let document =
            Html::parse_document(r#"<meta itemprop="totalTime" content="1 hour 5 minutes">"#);
        assert_eq!(
            first_text(&document, &["[itemprop=\"totalTime\"]"]).as_deref(),
            Some("1 hour 5 minutes")
        );
    }
}
