//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use condensar::prelude::*;
//! ```

pub use crate::artifact::{fingerprint, ArtifactStore, ModelCompiler};
pub use crate::compress::{compress, CompressedBundle};
pub use crate::error::{CondensarError, Result};
pub use crate::primitives::{Matrix, Vector};
pub use crate::synthetic::RegressionDataConfig;
