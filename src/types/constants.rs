/// Sentinel for a cell without a defined value.
pub const UNKNOWN: f64 = f64::NAN;

pub const LAYER_ELEVATION: &str = "elevation";
pub const LAYER_SLOPE: &str = "slope";
pub const LAYER_STEP: &str = "step";
pub const LAYER_ROUGHNESS: &str = "roughness";
pub const LAYER_ROBOT_SLOPE: &str = "robot_slope";
pub const LAYER_TRAVERSABILITY: &str = "traversability";

pub const TRAVERSABLE: f64 = 1.0;
pub const IMPASSABLE: f64 = 0.0;

pub const DEFAULT_TRAVERSABILITY: f64 = 0.5;
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.5;
/// 30 degrees.
pub const DEFAULT_MAX_INCLINATION: f64 = std::f64::consts::FRAC_PI_6;

/// Returns true if the cell value is defined.
#[inline]
pub fn is_known(value: f64) -> bool {
    !value.is_nan()
}
