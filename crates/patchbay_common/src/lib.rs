//! Shared foundational types used across the patchbay hardware-mapping compiler.
//!
//! This crate provides the brace-template engine used by hardware catalog and
//! code emitter templates, C++ literal formatting, execution phases, and
//! content hashing for generated artifacts.

#![warn(missing_docs)]

pub mod cpp;
pub mod hash;
pub mod phase;
pub mod template;

pub use cpp::{cpp_number, CppType};
pub use hash::ContentHash;
pub use phase::{ParsePhaseError, Phase};
pub use template::{format_map, Missing, TemplateError};
