use thiserror::Error;

/// Errors raised while loading the catalog or the hub configuration.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("duplicate game id `{0}` in registry")]
    DuplicateId(String),

    #[error("invalid game id `{0}`: expected ASCII letters, digits, `-` or `_`")]
    InvalidId(String),

    #[error("invalid accent color `{0}`: expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("failed to parse game catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("failed to parse hub config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid hub config: {0}")]
    InvalidConfig(String),
}
