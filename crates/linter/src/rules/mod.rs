//! Lint rule implementations.
//!
//! Each rule lives in its own file and implements [`crate::FragmentLintRule`].

mod missing_nolock;

pub use missing_nolock::{MissingNolockRuleImpl, MissingNolockState};
