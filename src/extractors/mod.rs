use crate::error::ExtractError;
use crate::model::{ExtractionMethod, ExtractionResult, PartialRecipe};
use crate::scoring;
use log::debug;
use scraper::Html;

mod css;
mod json_ld;
mod microdata;
pub mod normalize;
pub mod selectors;
mod sites;

pub use css::GenericCssExtractor;
pub use json_ld::JsonLdExtractor;
pub use microdata::MicroDataExtractor;
pub use sites::{site_extractors, SiteExtractor};

/// Everything a strategy may look at. Strategies never perform I/O.
pub struct ParsingContext {
    pub url: String,
    /// Lower-cased host with any leading `www.` removed; empty if the URL
    /// could not be parsed.
    pub hostname: String,
    pub document: Html,
    /// Search depth for nested JSON-LD objects.
    pub max_json_depth: usize,
}

impl ParsingContext {
    pub fn new(url: &str, html: &str) -> Self {
        ParsingContext {
            url: url.to_string(),
            hostname: resolve_hostname(url).unwrap_or_default(),
            document: Html::parse_document(html),
            max_json_depth: 8,
        }
    }
}

/// Host of `url`, lower-cased, without a leading `www.`.
pub fn resolve_hostname(url: &str) -> Result<String, ExtractError> {
    let parsed = url::Url::parse(url)?;
    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    Ok(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// What a strategy found, before scoring.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub recipe: PartialRecipe,
    pub method: ExtractionMethod,
    pub issues: Vec<String>,
}

pub trait Extractor: Send + Sync {
    /// Short identifier used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Method tag reported when this strategy fails outright.
    fn method(&self) -> ExtractionMethod;

    fn can_handle(&self, hostname: &str) -> bool;

    fn try_extract(&self, context: &ParsingContext) -> Result<Extraction, ExtractError>;

    /// Run the strategy and score its output. Never fails: errors become a
    /// zero-confidence result carrying the error as an issue.
    fn extract(&self, context: &ParsingContext) -> ExtractionResult {
        match self.try_extract(context) {
            Ok(extraction) if !extraction.recipe.is_empty() => {
                let confidence =
                    scoring::score(&extraction.recipe, &extraction.method, &context.hostname);
                debug!(
                    "{}: extracted recipe via {} with confidence {:.2}",
                    self.name(),
                    extraction.method,
                    confidence
                );
                ExtractionResult {
                    recipe: Some(extraction.recipe),
                    confidence,
                    method: extraction.method,
                    issues: extraction.issues,
                }
            }
            Ok(extraction) => {
                let mut issues = extraction.issues;
                issues.push(format!("{}: {}", self.name(), ExtractError::NoRecipe));
                ExtractionResult::failed(extraction.method, issues)
            }
            Err(e) => {
                debug!("{}: {}", self.name(), e);
                ExtractionResult::failed(self.method(), vec![format!("{}: {}", self.name(), e)])
            }
        }
    }
}
