//! Read-only queries against a traversability grid.
//!
//! Everything here is a pure function of its arguments and safe to call
//! concurrently on a shared snapshot.

pub mod footprint;
pub mod inclination;
pub mod path;

pub use footprint::{FootprintParams, FootprintVerdict, query_footprint};
pub use inclination::{InclinationParams, check_inclination};
pub use path::{FootprintPath, FootprintShape, PathVerdict, check_footprint_path, swept_polygon};
