pub mod constants;
pub mod error;
pub mod geometry;
pub mod info;

pub use constants::*;
pub use error::{ConfigError, TraversabilityError};
pub use geometry::{Bounds, Polygon, Pose2};
pub use info::MapInfo;
