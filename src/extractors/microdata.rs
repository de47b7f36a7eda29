use super::selectors::{clean_steps, element_image, element_text};
use super::{Extraction, Extractor, ParsingContext};
use crate::error::ExtractError;
use crate::model::{ExtractionMethod, PartialRecipe};
use crate::parsers::{extract_number, parse_duration};
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// schema.org microdata (`itemscope itemtype=".../Recipe"`).
pub struct MicroDataExtractor;

impl MicroDataExtractor {
    fn find_recipe_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let selector = Selector::parse("[itemscope][itemtype]").ok()?;
        document.select(&selector).find(|element| {
            element.value().attr("itemtype").is_some_and(|itemtype| {
                itemtype.contains("schema.org/Recipe")
                    || itemtype.contains("data-vocabulary.org/Recipe")
            })
        })
    }

    fn itemprop_selector(prop: &str) -> Option<Selector> {
        Selector::parse(&format!("[itemprop='{prop}']")).ok()
    }

    /// Elements carrying `prop` that belong to `root` itself, not to an item
    /// nested inside it (an author `Person`, a `NutritionInformation`).
    fn scoped_props<'a>(root: ElementRef<'a>, prop: &str) -> Vec<ElementRef<'a>> {
        let Some(selector) = Self::itemprop_selector(prop) else {
            return Vec::new();
        };
        root.select(&selector)
            .filter(|el| {
                el.ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|a| a.value().attr("itemscope").is_some())
                    .is_some_and(|scope| scope.id() == root.id())
            })
            .collect()
    }

    /// `content`/`datetime` attribute first (meta and time tags), then text.
    fn get_itemprop(&self, root: ElementRef, prop: &str) -> Option<String> {
        Self::scoped_props(root, prop).into_iter().find_map(|el| {
            let value = el
                .value()
                .attr("content")
                .or_else(|| el.value().attr("datetime"))
                .map(str::to_string)
                .unwrap_or_else(|| element_text(&el));
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        })
    }

    fn get_itemprop_list(&self, root: ElementRef, prop: &str) -> Vec<String> {
        Self::scoped_props(root, prop)
            .iter()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }
}

impl Extractor for MicroDataExtractor {
    fn name(&self) -> &'static str {
        "microdata"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Microdata
    }

    fn can_handle(&self, _hostname: &str) -> bool {
        true
    }

    fn try_extract(&self, context: &ParsingContext) -> Result<Extraction, ExtractError> {
        debug!("Attempting to extract recipe using MicroData extractor");

        // Only look inside a Recipe item: unscoped itemprops pick up site
        // titles and author bios.
        let container = self
            .find_recipe_container(&context.document)
            .ok_or(ExtractError::NoRecipe)?;

        let mut issues = Vec::new();
        let mut recipe = PartialRecipe::new(&context.url);

        recipe.title = self.get_itemprop(container, "name");
        recipe.description = self.get_itemprop(container, "description");
        recipe.image = Self::scoped_props(container, "image")
            .first()
            .and_then(|el| element_image(el, &context.url));
        recipe.prep_time = self
            .get_itemprop(container, "prepTime")
            .and_then(|t| parse_duration(&t));
        recipe.cook_time = self
            .get_itemprop(container, "cookTime")
            .and_then(|t| parse_duration(&t));
        recipe.total_time = self
            .get_itemprop(container, "totalTime")
            .and_then(|t| parse_duration(&t));
        recipe.servings = self
            .get_itemprop(container, "recipeYield")
            .and_then(|y| extract_number(&y));

        recipe.ingredients = self.get_itemprop_list(container, "recipeIngredient");
        if recipe.ingredients.is_empty() {
            recipe.ingredients = self.get_itemprop_list(container, "ingredients");
        }

        let mut steps = self.get_itemprop_list(container, "recipeInstructions");
        if steps.is_empty() {
            steps = self.get_itemprop_list(container, "instructions");
        }
        recipe.instructions = clean_steps(steps);

        for prop in ["recipeCategory", "recipeCuisine"] {
            for tag in self.get_itemprop_list(container, prop) {
                if !recipe.tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                    recipe.tags.push(tag);
                }
            }
        }

        if !recipe.has_title() {
            issues.push("Microdata recipe has no name".to_string());
        }

        Ok(Extraction {
            recipe,
            method: ExtractionMethod::Microdata,
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microdata_recipe() {
        let html = r#"
            <html><body>
            <div class="site-name" itemprop="name">My Food Blog</div>
            <div itemscope itemtype="https://schema.org/Recipe">
                <h2 itemprop="name">Tomato Soup</h2>
                <img itemprop="image" src="/soup.jpg">
                <meta itemprop="prepTime" content="PT10M">
                <time itemprop="cookTime" datetime="PT30M">30 minutes</time>
                <span itemprop="recipeYield">Serves 4</span>
                <span itemprop="recipeCategory">Soup</span>
                <ul>
                    <li itemprop="recipeIngredient">6 tomatoes</li>
                    <li itemprop="recipeIngredient">1 onion</li>
                </ul>
                <div itemprop="recipeInstructions">1. Roast the tomatoes until soft</div>
                <div itemprop="recipeInstructions">2. Blend with the onion</div>
            </div>
            </body></html>
        "#;

        let context = ParsingContext::new("https://soup.example/tomato", html);
        let result = MicroDataExtractor.try_extract(&context).unwrap();
        let recipe = result.recipe;

        assert_eq!(result.method, ExtractionMethod::Microdata);
        assert_eq!(recipe.title.as_deref(), Some("Tomato Soup"));
        assert_eq!(recipe.image.as_deref(), Some("https://soup.example/soup.jpg"));
        assert_eq!(recipe.prep_time.as_deref(), Some("10m"));
        assert_eq!(recipe.cook_time.as_deref(), Some("30m"));
        assert_eq!(recipe.servings, Some(4.0));
        assert_eq!(recipe.ingredients, vec!["6 tomatoes", "1 onion"]);
        assert_eq!(
            recipe.instructions,
            vec!["Roast the tomatoes until soft", "Blend with the onion"]
        );
        assert_eq!(recipe.tags, vec!["Soup"]);
    }

    #[test]
    fn test_nested_items_do_not_leak_into_recipe() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Recipe">
                <div itemprop="author" itemscope itemtype="https://schema.org/Person">
                    <span itemprop="name">Jane</span>
                    <img itemprop="image" src="/jane.jpg">
                </div>
                <h1 itemprop="name">Fish Pie</h1>
                <img itemprop="image" src="/pie.jpg">
                <div itemprop="nutrition" itemscope itemtype="https://schema.org/NutritionInformation">
                    <span itemprop="recipeIngredient">not an ingredient</span>
                </div>
                <span itemprop="recipeIngredient">500g white fish</span>
            </div>
        "#;
        let context = ParsingContext::new("https://pie.example/fish", html);
        let recipe = MicroDataExtractor.try_extract(&context).unwrap().recipe;

        assert_eq!(recipe.title.as_deref(), Some("Fish Pie"));
        assert_eq!(recipe.image.as_deref(), Some("https://pie.example/pie.jpg"));
        assert_eq!(recipe.ingredients, vec!["500g white fish"]);
    }

    #[test]
    fn test_no_container_is_error() {
        let html = r#"<div itemprop="name">Not a recipe</div>"#;
        let context = ParsingContext::new("https://x.example/", html);
        assert!(matches!(
            MicroDataExtractor.try_extract(&context),
            Err(ExtractError::NoRecipe)
        ));
    }
}
