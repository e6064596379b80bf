//! Core type aliases and re-exports

pub use glam::{
    Vec2, Vec3, Vec4,
    Mat4,
    IVec2,
};

/// Standard Result type for the editor core
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
