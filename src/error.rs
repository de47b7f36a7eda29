use thiserror::Error;

/// Errors that can occur while extracting a recipe from a page
#[derive(Error, Debug)]
pub enum ExtractError {
    /// An embedded JSON-LD block could not be parsed
    #[error("Failed to parse JSON-LD block: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single field could not be mapped from structured data
    #[error("Failed to map field '{field}': {reason}")]
    FieldMapping { field: &'static str, reason: String },

    /// A whole extraction strategy failed
    #[error("Strategy '{strategy}' failed: {reason}")]
    Strategy { strategy: String, reason: String },

    /// Nothing recipe-shaped was found
    #[error("No recipe could be extracted from this page")]
    NoRecipe,

    /// The source URL could not be parsed
    #[error("Invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to fetch the page (binary only)
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ExtractError {
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        ExtractError::FieldMapping {
            field,
            reason: reason.into(),
        }
    }
}
