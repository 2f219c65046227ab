//! Helpers shared between puzzle solutions

pub mod dp_cache;
pub mod text;
