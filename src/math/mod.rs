//! Mathematical utilities: rays, boxes, planes and the 2D grid geometry
//! used by the height tools

pub mod aabb;
pub mod ray;
pub mod plane;
pub mod triangle;
pub mod polygon;

pub use aabb::Aabb;
pub use ray::Ray;
pub use plane::Plane;
pub use triangle::{triangle_height, triangle_contains_point};
pub use polygon::Polygon;
