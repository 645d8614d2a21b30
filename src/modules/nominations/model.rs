//! Nomination models, re-exported from the `fses-models` crate.

pub use fses_models::nominations::*;
