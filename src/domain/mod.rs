//! Domain layer types and invariants.

pub mod assets;
pub mod content;
pub mod emoji;
pub mod error;
pub mod ir;
pub mod slug;
