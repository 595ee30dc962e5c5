pub mod circle;
pub mod polygon;

pub use circle::Disc;
pub use polygon::PolygonIterator;
