//! The extraction pipeline: dispatch, collect, merge, enhance, finalize.
//! Nothing is kept between calls.

use crate::config::EngineConfig;
use crate::enhance::enhance;
use crate::error::ExtractError;
use crate::extractors::{
    site_extractors, Extractor, GenericCssExtractor, JsonLdExtractor, MicroDataExtractor,
    ParsingContext,
};
use crate::model::{ExtractionMethod, ExtractionResult, PartialRecipe};
use crate::scoring::score_with_hosts;
use log::{debug, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Site strategies first, then microdata, then the universal JSON-LD pass.
pub fn default_strategies() -> Vec<Box<dyn Extractor>> {
    let mut strategies: Vec<Box<dyn Extractor>> = site_extractors()
        .into_iter()
        .map(|site| Box::new(site) as Box<dyn Extractor>)
        .collect();
    strategies.push(Box::new(MicroDataExtractor));
    strategies.push(Box::new(JsonLdExtractor));
    strategies
}

pub struct RecipeExtractor {
    extractors: Vec<Box<dyn Extractor>>,
    safety_net: GenericCssExtractor,
    config: EngineConfig,
}

impl Default for RecipeExtractor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RecipeExtractor {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_extractors(default_strategies(), config)
    }

    /// Use a custom strategy list. The generic markup extractor still runs
    /// after them.
    pub fn with_extractors(extractors: Vec<Box<dyn Extractor>>, config: EngineConfig) -> Self {
        RecipeExtractor {
            extractors,
            safety_net: GenericCssExtractor,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extract a recipe from already-fetched markup. Always returns a well
    /// formed result.
    pub fn extract(&self, url: &str, html: &str) -> ExtractionResult {
        let mut context = ParsingContext::new(url, html);
        context.max_json_depth = self.config.max_json_depth;
        self.extract_document(&context)
    }

    pub fn extract_document(&self, context: &ParsingContext) -> ExtractionResult {
        let mut notes = Vec::new();
        if context.hostname.is_empty() {
            notes.push(format!(
                "Could not resolve a hostname from '{}'; site strategies skipped",
                context.url
            ));
        }

        let results = self.collect(context);
        let best = best_of(&results);
        let merged = self.merge(context, &results);

        let best_known = match (&best, &merged) {
            (Some(b), Some(m)) if m.confidence > b.confidence => Some(m),
            (Some(b), _) => Some(b),
            (None, Some(m)) => Some(m),
            (None, None) => None,
        };
        let enhanced = match best_known {
            Some(known) if known.confidence < self.config.enhancement_threshold => {
                debug!(
                    "Best confidence {:.2} below {:.2}; running enhancement",
                    known.confidence, self.config.enhancement_threshold
                );
                enhance(context, known, &self.config)
            }
            _ => None,
        };

        let mut result = finalize(&results, best, merged, enhanced);
        notes.append(&mut result.issues);
        result.issues = notes;
        result
    }

    /// Dispatch and collect: every applicable strategy, then the safety net.
    fn collect(&self, context: &ParsingContext) -> Vec<ExtractionResult> {
        let mut results: Vec<ExtractionResult> = self
            .extractors
            .iter()
            .filter(|extractor| extractor.can_handle(&context.hostname))
            .map(|extractor| run_guarded(extractor.as_ref(), context))
            .collect();
        results.push(run_guarded(&self.safety_net, context));

        if !self.config.reputable_hosts.is_empty() {
            for result in &mut results {
                if let Some(recipe) = &result.recipe {
                    result.confidence = score_with_hosts(
                        recipe,
                        &result.method,
                        &context.hostname,
                        &self.config.reputable_hosts,
                    );
                }
            }
        }
        results
    }

    /// Field-level most-complete-wins over every result that found a recipe.
    fn merge(
        &self,
        context: &ParsingContext,
        results: &[ExtractionResult],
    ) -> Option<ExtractionResult> {
        let mut sources: Vec<(&ExtractionResult, &PartialRecipe)> = results
            .iter()
            .filter_map(|r| r.recipe.as_ref().map(|recipe| (r, recipe)))
            .collect();
        // the sort is stable, so registry order breaks ties
        sources.sort_by(|a, b| b.0.confidence.total_cmp(&a.0.confidence));
        let (top, _) = sources.first()?;

        let mut recipe = PartialRecipe::new(&context.url);
        for (_, source) in &sources {
            recipe.fill_missing_from(source);
        }
        let recipes: Vec<&PartialRecipe> = sources.iter().map(|(_, r)| *r).collect();
        recipe.ingredients = longest(&recipes, |r| r.ingredients.as_slice());
        recipe.instructions = longest(&recipes, |r| r.instructions.as_slice());

        if !is_usable(&recipe) {
            debug!("Merged result lacks a title or ingredients; discarded");
            return None;
        }

        let mut issues = Vec::new();
        for result in results {
            for issue in &result.issues {
                if !issues.contains(issue) {
                    issues.push(issue.clone());
                }
            }
        }

        let method = ExtractionMethod::merged(&top.method);
        let confidence = score_with_hosts(
            &recipe,
            &method,
            &context.hostname,
            &self.config.reputable_hosts,
        );
        debug!("Merged {} results with confidence {:.2}", sources.len(), confidence);
        Some(ExtractionResult {
            recipe: Some(recipe),
            confidence,
            method,
            issues,
        })
    }
}

/// First of the longest lists.
fn longest(recipes: &[&PartialRecipe], list: fn(&PartialRecipe) -> &[String]) -> Vec<String> {
    let mut best: &[String] = &[];
    for recipe in recipes {
        let candidate = list(recipe);
        if candidate.len() > best.len() {
            best = candidate;
        }
    }
    best.to_vec()
}

fn best_of(results: &[ExtractionResult]) -> Option<ExtractionResult> {
    let mut best: Option<&ExtractionResult> = None;
    for result in results {
        if best.map_or(true, |b| result.confidence > b.confidence) {
            best = Some(result);
        }
    }
    best.cloned()
}

fn run_guarded(extractor: &dyn Extractor, context: &ParsingContext) -> ExtractionResult {
    match panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(context))) {
        Ok(result) => {
            debug!(
                "{}: confidence {:.2} ({} issues)",
                extractor.name(),
                result.confidence,
                result.issues.len()
            );
            result
        }
        Err(payload) => {
            let error = ExtractError::Strategy {
                strategy: extractor.name().to_string(),
                reason: panic_reason(payload.as_ref()),
            };
            warn!("{}", error);
            ExtractionResult::failed(extractor.method(), vec![error.to_string()])
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "strategy panicked".to_string()
    }
}

/// A recipe worth returning: it has a title and at least one ingredient.
fn is_usable(recipe: &PartialRecipe) -> bool {
    recipe.has_title() && !recipe.ingredients.is_empty()
}

/// The highest-confidence usable candidate wins; earlier candidates win
/// ties. With no usable candidate the result is a total failure.
fn finalize(
    results: &[ExtractionResult],
    best: Option<ExtractionResult>,
    merged: Option<ExtractionResult>,
    enhanced: Option<ExtractionResult>,
) -> ExtractionResult {
    let mut winner: Option<ExtractionResult> = None;
    for candidate in [best, merged, enhanced]
        .into_iter()
        .flatten()
        .filter(|c| c.recipe.as_ref().is_some_and(is_usable))
    {
        if winner
            .as_ref()
            .map_or(true, |w| candidate.confidence > w.confidence)
        {
            winner = Some(candidate);
        }
    }

    if let Some(winner) = winner {
        debug!(
            "Finalized with {} at confidence {:.2}",
            winner.method, winner.confidence
        );
        return winner;
    }

    let mut issues: Vec<String> = Vec::new();
    for issue in results.iter().flat_map(|r| r.issues.iter()) {
        if !issues.contains(issue) {
            issues.push(issue.clone());
        }
    }
    issues.push(ExtractError::NoRecipe.to_string());
    debug!("No usable recipe found");
    ExtractionResult::failed(ExtractionMethod::CssSelectors, issues)
}
