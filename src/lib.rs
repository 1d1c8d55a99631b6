//! Condensar: sufficient-statistics data preparation for Bayesian linear
//! regression.
//!
//! Condensar reduces a regression dataset with repeated covariate patterns to
//! its unique predictor rows plus the sufficient statistics (count, outcome
//! sum, squared-outcome sum) a Gaussian-likelihood sampler needs, and caches
//! compiled model artifacts under a fingerprint of the model source text so
//! expensive recompilation happens at most once per source revision.
//!
//! The sampler itself is an external collaborator: this crate hands it a
//! [`compress::CompressedBundle`] (or its JSON data binding) and a compiled
//! artifact, nothing more.
//!
//! # Quick Start
//!
//! ```
//! use condensar::prelude::*;
//!
//! // Simulate a dataset whose integer-valued predictors repeat.
//! let config = RegressionDataConfig::new().with_seed(42);
//! let (x, y) = config.generate(500).unwrap();
//!
//! // Compress to unique rows + sufficient statistics.
//! let bundle = compress(&y, &x).unwrap();
//! assert!(bundle.n_unique() <= 500);
//! assert_eq!(bundle.weights().iter().sum::<u64>(), 500);
//!
//! // Export under the sampler's field names.
//! let data = bundle.to_sampler_data();
//! assert_eq!(data["K"], 3);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`compress`]: Sufficient-statistics compression (the core)
//! - [`artifact`]: Fingerprint-keyed compiled-model artifact cache
//! - [`synthetic`]: Synthetic regression data for tests and examples
//! - [`error`]: Error types

pub mod artifact;
pub mod compress;
pub mod error;
pub mod prelude;
pub mod primitives;
pub mod synthetic;

pub use error::{CondensarError, Result};
pub use primitives::{Matrix, Vector};
