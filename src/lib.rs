//! gndedit - Ground data model and height-editing core for a map editor

pub mod core;
pub mod math;
pub mod ground;
pub mod selection;
pub mod edit;
pub mod clipboard;
pub mod map;
