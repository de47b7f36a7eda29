use super::selectors::{extract_with, GENERIC_SELECTORS};
use super::{Extraction, Extractor, ParsingContext};
use crate::error::ExtractError;
use crate::model::ExtractionMethod;
use log::debug;

/// Host-agnostic markup extraction. The orchestrator always runs this one
/// last as a safety net.
pub struct GenericCssExtractor;

impl Extractor for GenericCssExtractor {
    fn name(&self) -> &'static str {
        "generic_css"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::CssSelectors
    }

    fn can_handle(&self, _hostname: &str) -> bool {
        true
    }

    fn try_extract(&self, context: &ParsingContext) -> Result<Extraction, ExtractError> {
        debug!("Attempting to extract recipe using generic selectors");
        let recipe = extract_with(&context.document, &GENERIC_SELECTORS, &context.url);

        let mut issues = Vec::new();
        if !recipe.has_title() {
            issues.push("Generic selectors found no title".to_string());
        }
        if recipe.ingredients.is_empty() {
            issues.push("Generic selectors found no ingredients".to_string());
        }

        Ok(Extraction {
            recipe,
            method: ExtractionMethod::CssSelectors,
            issues,
        })
    }
}
