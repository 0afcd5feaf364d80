//! Feature derivation for LeadLens.
//!
//! Maps a fetched profile plus the four manually entered company fields into
//! the fixed 37-feature numeric vector the frozen classifier was trained
//! against. Pure and total: no I/O, and any input — including an absent
//! profile and all-empty manual fields — produces a fully populated vector.
//! Malformed strings degrade to zero/neutral values and are surfaced only
//! through the debug trace.

mod derive;
mod keywords;
mod parse;
mod vector;

pub use derive::{derive, ACTIVITY_FALLBACK_DAYS};
pub use vector::{DebugTrace, FeatureVector, TraceField, FEATURE_NAMES};
