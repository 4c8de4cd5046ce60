use super::lexical::DEFAULT_DOMAIN_KEYWORDS;

#[derive(Debug, Clone)]
pub struct SemanticConfig {
    /// Embedding dimension for the default backend (powers of two work well).
    pub dimension: usize,
    /// High-signal terms earning the lexical-fallback bonus.
    pub domain_keywords: Vec<String>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            domain_keywords: DEFAULT_DOMAIN_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Environment override for deployments that tune the embedding dimension.
pub fn load_config_from_env() -> SemanticConfig {
    let mut config = SemanticConfig::default();
    if let Some(dimension) = std::env::var("JOBFIT_EMBED_DIMENSION")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        config.dimension = dimension;
    }
    config
}
