use thiserror::Error;

/// Problems found while building a filter pipeline from its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("stage '{stage}' reads layer '{layer}' which no base layer or earlier stage provides")]
    UnconfiguredInput { stage: String, layer: String },
    #[error("stage '{stage}' reads layer '{layer}' which is only produced by itself or a later stage")]
    CyclicDependency { stage: String, layer: String },
    #[error("duplicate stage name '{0}'")]
    DuplicateStage(String),
    #[error("risk layer '{0}' is not produced by any stage or base layer")]
    UnknownRiskLayer(String),
    #[error("no risk layers to combine")]
    NoRiskLayers,
    #[error("invalid parameter for stage '{stage}': {reason}")]
    InvalidParameter { stage: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TraversabilityError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
    #[error("layer '{0}' does not match the grid geometry")]
    LayerMismatch(String),
    #[error("missing layer '{0}'")]
    MissingLayer(String),
    #[error("no valid filter pipeline is configured")]
    NotConfigured,
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
