//! The code emitter.
//!
//! Renders wired apps into the C++ build unit of one target. Each app is a
//! struct whose entry points (`init`, `audioCallback`, `mainloopCallback`,
//! `displayCallback`, and the parameter view when the target has one) are
//! assembled from phase-tagged [`Fragment`]s in a fixed order: control reads,
//! parameter scaling, patch invocation, output writeback, MIDI throttling,
//! then post-audio inserts. All apps of a build share a union, since only one
//! is live at a time, and are registered in an `appdefs` table.

#![warn(missing_docs)]

pub mod app;
pub mod defines;
pub mod error;
pub mod fragment;
pub mod order;
pub mod unit;

pub use app::{throttle_period, write_app, Context};
pub use defines::target_defines;
pub use error::{EmitError, E401, E402, E403};
pub use fragment::{CodeWriter, Fragment};
pub use order::{order_patches, W401};
pub use unit::{emit, AppSource, Artifact};
