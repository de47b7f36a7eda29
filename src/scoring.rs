//! Heuristic confidence for a partial recipe, always within `[0, 1]`.

use crate::model::{ExtractionMethod, PartialRecipe};

const TITLE_BONUS: f64 = 0.1;
const INGREDIENT_BONUS: f64 = 0.015;
const MAX_COUNTED_INGREDIENTS: usize = 10;
const INSTRUCTION_BONUS: f64 = 0.01875;
const MAX_COUNTED_INSTRUCTIONS: usize = 8;
const IMAGE_BONUS: f64 = 0.05;
const DESCRIPTION_BONUS: f64 = 0.03;
const MIN_DESCRIPTION_LEN: usize = 20;
const TIMING_BONUS: f64 = 0.04;
const SERVINGS_BONUS: f64 = 0.03;
const REPUTATION_BONUS: f64 = 0.05;

/// Hosts whose markup has historically extracted cleanly.
pub const REPUTABLE_HOSTS: &[&str] = &[
    "allrecipes.com",
    "bbcgoodfood.com",
    "bonappetit.com",
    "cooking.nytimes.com",
    "epicurious.com",
    "foodnetwork.com",
    "kingarthurbaking.com",
    "seriouseats.com",
    "simplyrecipes.com",
];

fn base_score(method: &ExtractionMethod) -> f64 {
    match method.base() {
        ExtractionMethod::JsonLd => 0.5,
        ExtractionMethod::SiteSpecific => 0.45,
        ExtractionMethod::Microdata => 0.4,
        ExtractionMethod::CssSelectors => 0.25,
        // base() never returns a merge
        ExtractionMethod::Merged(_) => 0.25,
    }
}

fn is_reputable(hostname: &str, extra: &[String]) -> bool {
    let matches = |host: &str| {
        hostname == host
            || hostname
                .strip_suffix(host)
                .is_some_and(|prefix| prefix.ends_with('.'))
    };
    REPUTABLE_HOSTS.iter().any(|h| matches(*h)) || extra.iter().any(|h| matches(h.as_str()))
}

/// Score with the built-in reputation list only.
pub fn score(recipe: &PartialRecipe, method: &ExtractionMethod, hostname: &str) -> f64 {
    score_with_hosts(recipe, method, hostname, &[])
}

/// Score, counting `extra_hosts` as reputable as well.
pub fn score_with_hosts(
    recipe: &PartialRecipe,
    method: &ExtractionMethod,
    hostname: &str,
    extra_hosts: &[String],
) -> f64 {
    let mut score = base_score(method);

    if recipe.has_title() {
        score += TITLE_BONUS;
    }
    score += recipe.ingredients.len().min(MAX_COUNTED_INGREDIENTS) as f64 * INGREDIENT_BONUS;
    score += recipe.instructions.len().min(MAX_COUNTED_INSTRUCTIONS) as f64 * INSTRUCTION_BONUS;
    if recipe.image.is_some() {
        score += IMAGE_BONUS;
    }
    if recipe
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() >= MIN_DESCRIPTION_LEN)
    {
        score += DESCRIPTION_BONUS;
    }
    if recipe.has_timing() {
        score += TIMING_BONUS;
    }
    if recipe.servings.is_some() {
        score += SERVINGS_BONUS;
    }
    if is_reputable(hostname, extra_hosts) {
        score += REPUTATION_BONUS;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe_with(ingredients: usize, instructions: usize) -> PartialRecipe {
        let mut recipe = PartialRecipe::new("https://example.com");
        recipe.title = Some("Stew".to_string());
        recipe.ingredients = (0..ingredients).map(|i| format!("item {i}")).collect();
        recipe.instructions = (0..instructions).map(|i| format!("step number {i}")).collect();
        recipe
    }

    #[test]
    fn test_method_ordering() {
        let recipe = recipe_with(3, 3);
        let json_ld = score(&recipe, &ExtractionMethod::JsonLd, "example.com");
        let site = score(&recipe, &ExtractionMethod::SiteSpecific, "example.com");
        let css = score(&recipe, &ExtractionMethod::CssSelectors, "example.com");
        assert!(json_ld > site && site > css);
        assert_eq!(
            score(&recipe, &ExtractionMethod::merged(&ExtractionMethod::JsonLd), "example.com"),
            json_ld
        );
    }

    #[test]
    fn test_more_data_never_scores_lower() {
        let mut previous = 0.0;
        for n in 0..20 {
            let current = score(&recipe_with(n, n), &ExtractionMethod::CssSelectors, "x.org");
            assert!(current >= previous);
            previous = current;
        }

        let mut recipe = recipe_with(30, 30);
        let before = score(&recipe, &ExtractionMethod::JsonLd, "allrecipes.com");
        recipe.image = Some("a.jpg".to_string());
        recipe.description = Some("A long enough description of the stew".to_string());
        recipe.total_time = Some("1h".to_string());
        recipe.servings = Some(4.0);
        let after = score(&recipe, &ExtractionMethod::JsonLd, "allrecipes.com");
        assert!(after >= before);
        assert!(after <= 1.0);
    }

    #[test]
    fn test_reputation_bonus() {
        let recipe = recipe_with(2, 2);
        let plain = score(&recipe, &ExtractionMethod::JsonLd, "myblog.net");
        assert!(score(&recipe, &ExtractionMethod::JsonLd, "seriouseats.com") > plain);
        assert!(
            score_with_hosts(&recipe, &ExtractionMethod::JsonLd, "myblog.net", &["myblog.net".to_string()])
                > plain
        );
    }

    #[test]
    fn test_empty_recipe_is_base_only() {
        let recipe = PartialRecipe::new("u");
        assert_eq!(score(&recipe, &ExtractionMethod::CssSelectors, ""), 0.25);
    }
}
