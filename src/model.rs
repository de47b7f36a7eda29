use serde::{Serialize, Serializer};
use std::fmt;

/// A best-effort recipe record. Every field except the two step lists and
/// the source URL may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRecipe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    pub source_url: String,
}

impl PartialRecipe {
    pub fn new(source_url: &str) -> Self {
        PartialRecipe {
            source_url: source_url.to_string(),
            ..Default::default()
        }
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn has_timing(&self) -> bool {
        self.prep_time.is_some() || self.cook_time.is_some() || self.total_time.is_some()
    }

    /// True when there is nothing at all worth returning.
    pub fn is_empty(&self) -> bool {
        !self.has_title() && self.ingredients.is_empty() && self.instructions.is_empty()
    }

    /// Copy every field that is missing here from `other`. Lists are only
    /// taken when empty here.
    pub fn fill_missing_from(&mut self, other: &PartialRecipe) {
        fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(from);
            }
        }

        if !self.has_title() {
            self.title.clone_from(&other.title);
        }
        fill(&mut self.description, &other.description);
        fill(&mut self.image, &other.image);
        fill(&mut self.prep_time, &other.prep_time);
        fill(&mut self.cook_time, &other.cook_time);
        fill(&mut self.total_time, &other.total_time);
        fill(&mut self.servings, &other.servings);
        fill(&mut self.difficulty, &other.difficulty);
        if self.ingredients.is_empty() {
            self.ingredients.clone_from(&other.ingredients);
        }
        if self.instructions.is_empty() {
            self.instructions.clone_from(&other.instructions);
        }
        if self.tags.is_empty() {
            self.tags.clone_from(&other.tags);
        }
    }
}

/// Where a result came from. Merged results carry the method of their
/// highest-confidence contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMethod {
    JsonLd,
    Microdata,
    CssSelectors,
    SiteSpecific,
    Merged(Box<ExtractionMethod>),
}

impl ExtractionMethod {
    pub fn merged(base: &ExtractionMethod) -> Self {
        match base {
            // never nest merges
            ExtractionMethod::Merged(inner) => ExtractionMethod::Merged(inner.clone()),
            other => ExtractionMethod::Merged(Box::new(other.clone())),
        }
    }

    /// The method with any merge wrapper removed.
    pub fn base(&self) -> &ExtractionMethod {
        match self {
            ExtractionMethod::Merged(inner) => inner.base(),
            other => other,
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::JsonLd => write!(f, "json-ld"),
            ExtractionMethod::Microdata => write!(f, "microdata"),
            ExtractionMethod::CssSelectors => write!(f, "css-selectors"),
            ExtractionMethod::SiteSpecific => write!(f, "site-specific"),
            ExtractionMethod::Merged(inner) => write!(f, "merged-{inner}"),
        }
    }
}

impl Serialize for ExtractionMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one extraction call. Always well formed, even on total failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<PartialRecipe>,
    pub confidence: f64,
    pub method: ExtractionMethod,
    pub issues: Vec<String>,
}

impl ExtractionResult {
    pub fn failed(method: ExtractionMethod, issues: Vec<String>) -> Self {
        ExtractionResult {
            recipe: None,
            confidence: 0.0,
            method,
            issues,
        }
    }
}
