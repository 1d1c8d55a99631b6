//! Compiled-model artifact cache keyed by source fingerprint.
//!
//! Compiling a probabilistic model is expensive and deterministic in the
//! source text, so compiled artifacts are persisted under a key derived from
//! a digest of that text. Identical source always resolves to the same key;
//! any edit moves the artifact to a new key, and stale artifacts are left in
//! place for manual cleanup.
//!
//! The compile step itself is an external collaborator, abstracted behind
//! [`ModelCompiler`]. Concurrent callers compiling under the same key race on
//! the check-then-write sequence; the store accepts that race (last rename
//! wins) and writes through a process-local temp file so readers never see a
//! torn artifact.

use crate::error::{CondensarError, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Derives the numeric cache key for a piece of model source text.
///
/// SHA-256 over the UTF-8 bytes of `source`, with the digest reduced modulo
/// 4294967295 (the digest interpreted as a big-endian integer). Pure and
/// deterministic: identical text always produces the same key.
///
/// # Examples
///
/// ```
/// use condensar::artifact::fingerprint;
///
/// let a = fingerprint("data { int N; }");
/// let b = fingerprint("data { int N; }");
/// assert_eq!(a, b);
/// assert_ne!(a, fingerprint("data { int M; }"));
/// ```
#[must_use]
pub fn fingerprint(source: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let digest = hasher.finalize();

    // Horner reduction: digest as a big-endian integer, mod 4294967295.
    const MODULUS: u64 = 4_294_967_295;
    digest
        .iter()
        .fold(0u64, |acc, &byte| ((acc << 8) | u64::from(byte)) % MODULUS)
}

/// The external compile step: turns model source text into a persistable
/// artifact.
///
/// Implementations wrap whatever toolchain actually builds the model; the
/// store only requires that the artifact round-trips through serde.
pub trait ModelCompiler {
    /// Compiled representation of the model.
    type Artifact: Serialize + DeserializeOwned;

    /// Compiles `source` into an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`CondensarError::CompileFailure`] (or any other error the
    /// toolchain surfaces) if the source is rejected. The store propagates
    /// compile errors unmodified and never retries.
    fn compile(&self, source: &str) -> Result<Self::Artifact>;
}

/// Filesystem-backed artifact store.
///
/// One artifact per fingerprint, named `lm_model_<key>.json` in the store
/// directory (the working directory unless configured otherwise).
///
/// # Examples
///
/// ```
/// use condensar::artifact::{ArtifactStore, ModelCompiler};
/// use condensar::error::Result;
///
/// struct EchoCompiler;
///
/// impl ModelCompiler for EchoCompiler {
///     type Artifact = String;
///
///     fn compile(&self, source: &str) -> Result<String> {
///         Ok(source.to_uppercase())
///     }
/// }
///
/// let dir = std::env::temp_dir().join("condensar-doc-example");
/// std::fs::create_dir_all(&dir).unwrap();
/// let store = ArtifactStore::new(EchoCompiler).with_dir(&dir);
///
/// let first = store.get_or_compile("model {}").unwrap();   // compiles
/// let second = store.get_or_compile("model {}").unwrap();  // cache hit
/// assert_eq!(first, second);
/// # std::fs::remove_file(store.artifact_path("model {}")).ok();
/// ```
#[derive(Debug)]
pub struct ArtifactStore<C> {
    compiler: C,
    dir: PathBuf,
}

impl<C: ModelCompiler> ArtifactStore<C> {
    /// Creates a store over the working directory.
    #[must_use]
    pub fn new(compiler: C) -> Self {
        Self {
            compiler,
            dir: PathBuf::from("."),
        }
    }

    /// Sets the directory artifacts are persisted in.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Path the artifact for `source` is (or would be) persisted at.
    #[must_use]
    pub fn artifact_path(&self, source: &str) -> PathBuf {
        self.dir.join(format!("lm_model_{}.json", fingerprint(source)))
    }

    /// Returns the cached artifact for `source`, compiling and persisting it
    /// first if no artifact exists under its key.
    ///
    /// This is the one auto-recovery path: a cache miss falls back to
    /// compilation, and the source text is threaded through to the compiler.
    ///
    /// # Errors
    ///
    /// Propagates compile errors unmodified, and I/O or deserialization
    /// errors from the store.
    pub fn get_or_compile(&self, source: &str) -> Result<C::Artifact> {
        let path = self.artifact_path(source);
        if path.exists() {
            info!("model artifact cache hit: {}", path.display());
            return self.read_artifact(&path);
        }
        info!("no artifact at {}; compiling model", path.display());
        self.build(source, &path)
    }

    /// Unconditionally compiles `source` and persists the artifact,
    /// overwriting anything already stored under its key.
    ///
    /// # Errors
    ///
    /// Propagates compile errors unmodified, and I/O errors from the store.
    pub fn compile_and_store(&self, source: &str) -> Result<C::Artifact> {
        let path = self.artifact_path(source);
        info!("compiling model, artifact will be stored at {}", path.display());
        self.build(source, &path)
    }

    /// Loads the cached artifact for `source` without any compile fallback.
    ///
    /// # Errors
    ///
    /// Returns [`CondensarError::ArtifactNotFound`] with the derived key if
    /// nothing is persisted under it.
    pub fn load(&self, source: &str) -> Result<C::Artifact> {
        let path = self.artifact_path(source);
        if !path.exists() {
            return Err(CondensarError::ArtifactNotFound {
                key: fingerprint(source),
            });
        }
        self.read_artifact(&path)
    }

    fn build(&self, source: &str, path: &Path) -> Result<C::Artifact> {
        let artifact = self.compiler.compile(source)?;
        self.write_artifact(&artifact, path)?;
        Ok(artifact)
    }

    fn write_artifact(&self, artifact: &C::Artifact, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(artifact)
            .map_err(|e| CondensarError::Serialization(e.to_string()))?;

        // Temp-then-rename so a racing reader never observes a partial write.
        // The pid keeps racing writers off each other's temp files.
        let tmp = path.with_extension(format!("json.{}.tmp", std::process::id()));
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read_artifact(&self, path: &Path) -> Result<C::Artifact> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| CondensarError::Serialization(e.to_string()))
    }
}
