pub mod config;
pub mod engine;
pub mod filters;
pub mod grid;
pub mod iterators;
pub mod pipeline;
pub mod query;
pub mod types;

pub use config::EngineConfig;
pub use engine::{TraversabilityEngine, TraversabilitySnapshot};
pub use filters::{Filter, FilterConfig, PipelineConfig};
pub use grid::{Grid2d, LayeredGrid};
pub use pipeline::{Combination, FilterPipeline};
pub use query::{
    FootprintPath, FootprintShape, FootprintVerdict, PathVerdict, check_footprint_path,
    check_inclination, query_footprint,
};
pub use types::{ConfigError, MapInfo, Polygon, Pose2, TraversabilityError};
