pub mod config;
mod enhance;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod model;
pub mod orchestrator;
pub mod parsers;
pub mod scoring;

pub use config::EngineConfig;
pub use error::ExtractError;
pub use extractors::{Extractor, ParsingContext};
pub use model::{ExtractionMethod, ExtractionResult, PartialRecipe};
pub use orchestrator::RecipeExtractor;

/// Extract a recipe from already-fetched markup with the default pipeline.
///
/// Never fails; a page with nothing usable yields a result without a recipe,
/// zero confidence and at least one issue.
pub fn extract(url: &str, html: &str) -> ExtractionResult {
    RecipeExtractor::default().extract(url, html)
}
