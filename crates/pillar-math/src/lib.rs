//! # Pillar Math
//!
//! Numerical utilities for the Pillar fixed income analytics library.
//!
//! This crate provides:
//!
//! - **Solvers**: Root finding (Newton-Raphson, Bisection, and the
//!   hybrid combination every pricing routine shares)
//! - **Step conditions**: Hooks applied to a state vector as a time
//!   stepper advances, including snapshot capture
//!
//! ## Design Philosophy
//!
//! - **One solver path**: Yields, z-spreads, and curve pillars are all
//!   solved through the same monitored-Newton-with-fallback primitive
//! - **Numerical stability**: Divergence and flat-derivative guards
//!   instead of trusting the iteration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]

pub mod error;
pub mod fdm;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::fdm::{SnapshotCondition, StepCondition};
    pub use crate::solvers::{
        bisection, hybrid, hybrid_numerical, newton_raphson, newton_raphson_numerical,
        SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
