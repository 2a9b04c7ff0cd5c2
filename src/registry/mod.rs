//! Model registry: artifact persistence and the inference context
//!
//! `save` writes one JSON artifact per trained model plus the codebooks,
//! the scaler, the metrics document, and a manifest carrying a SHA-256
//! digest per artifact. `load` rebuilds an immutable `InferenceContext`,
//! tolerating individually missing artifacts: an absent model simply does
//! not appear in the ensemble, absent metrics yield an empty bundle.
//!
//! `ContextCache` is the process-wide slot for the loaded context. Loads
//! take the write lock, so they are mutually exclusive; published contexts
//! are `Arc`-shared and read-only, so inference never locks against itself.

use crate::encode::{FeatureEncoder, StandardScaler};
use crate::error::{Error, Result};
use crate::model::{ClassifierEntry, RegressorEntry};
use crate::train::{MetricsBundle, TrainedEnsemble};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Classifier artifact file names, in registration order
const CLASSIFIER_FILES: [(&str, &str); 2] = [
    ("RandomForest", "clf_RandomForest.json"),
    ("GradientBoosting", "clf_GradientBoosting.json"),
];

/// Regressor artifact file names, in registration order
const REGRESSOR_FILES: [(&str, &str); 2] = [
    ("RandomForest", "reg_RandomForest.json"),
    ("LinearRegression", "reg_LinearRegression.json"),
];

const CODEBOOKS_FILE: &str = "codebooks.json";
const SCALER_FILE: &str = "scaler.json";
const METRICS_FILE: &str = "metrics.json";
const MANIFEST_FILE: &str = "manifest.json";

/// Integrity record written alongside the artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: String,
    pub created_at: String,
    /// artifact file name -> sha256 digest
    pub artifacts: BTreeMap<String, String>,
}

/// An immutable, loaded model bundle. Constructed by `load`, published
/// wholesale through the cache, never mutated in place.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    pub encoder: Option<FeatureEncoder>,
    pub scaler: Option<StandardScaler>,
    pub classifiers: Vec<ClassifierEntry>,
    pub regressors: Vec<RegressorEntry>,
    pub metrics: MetricsBundle,
}

impl InferenceContext {
    pub fn classifier_names(&self) -> Vec<&str> {
        self.classifiers.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn regressor_names(&self) -> Vec<&str> {
        self.regressors.iter().map(|e| e.name.as_str()).collect()
    }

    /// Build a context directly from a training pass, bypassing disk.
    pub fn from_ensemble(ensemble: TrainedEnsemble) -> Self {
        Self {
            encoder: Some(ensemble.encoder),
            scaler: Some(ensemble.scaler),
            classifiers: ensemble.classifiers,
            regressors: ensemble.regressors,
            metrics: ensemble.metrics,
        }
    }
}

/// Persist every artifact of a successful training pass under `dir`
pub fn save(dir: impl AsRef<Path>, ensemble: &TrainedEnsemble) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut digests = BTreeMap::new();

    for (entry, (_, file)) in ensemble.classifiers.iter().zip(CLASSIFIER_FILES) {
        digests.insert(file.to_string(), write_json(dir.join(file), entry)?);
    }
    for (entry, (_, file)) in ensemble.regressors.iter().zip(REGRESSOR_FILES) {
        digests.insert(file.to_string(), write_json(dir.join(file), entry)?);
    }

    digests.insert(
        CODEBOOKS_FILE.to_string(),
        write_json(dir.join(CODEBOOKS_FILE), &ensemble.encoder)?,
    );
    digests.insert(
        SCALER_FILE.to_string(),
        write_json(dir.join(SCALER_FILE), &ensemble.scaler)?,
    );
    digests.insert(
        METRICS_FILE.to_string(),
        write_json(dir.join(METRICS_FILE), &ensemble.metrics)?,
    );

    let manifest = ArtifactManifest {
        version: env!("CARGO_PKG_VERSION").to_string(),
        created_at: Utc::now().to_rfc3339(),
        artifacts: digests,
    };
    write_json(dir.join(MANIFEST_FILE), &manifest)?;

    Ok(())
}

/// Load whatever artifacts are present under `dir`.
///
/// Fails with `NotReady` only when no model artifact at all is usable;
/// individual absences degrade the ensemble instead. When a manifest is
/// present, every artifact read is digest-checked against it.
pub fn load(dir: impl AsRef<Path>) -> Result<InferenceContext> {
    let dir = dir.as_ref();
    let manifest: Option<ArtifactManifest> =
        tolerate(read_json(&dir.join(MANIFEST_FILE), None))?;
    let digests = manifest.as_ref().map(|m| &m.artifacts);

    let mut classifiers = Vec::new();
    for (name, file) in CLASSIFIER_FILES {
        let entry: Option<ClassifierEntry> =
            tolerate(read_json(&dir.join(file), expected(digests, file)))?;
        if let Some(entry) = entry {
            debug_assert_eq!(entry.name, name);
            classifiers.push(entry);
        }
    }

    let mut regressors = Vec::new();
    for (name, file) in REGRESSOR_FILES {
        let entry: Option<RegressorEntry> =
            tolerate(read_json(&dir.join(file), expected(digests, file)))?;
        if let Some(entry) = entry {
            debug_assert_eq!(entry.name, name);
            regressors.push(entry);
        }
    }

    if classifiers.is_empty() && regressors.is_empty() {
        return Err(Error::NotReady(format!(
            "no model artifacts under {}",
            dir.display()
        )));
    }

    let encoder = tolerate(read_json(
        &dir.join(CODEBOOKS_FILE),
        expected(digests, CODEBOOKS_FILE),
    ))?;
    let scaler = tolerate(read_json(&dir.join(SCALER_FILE), expected(digests, SCALER_FILE)))?;
    let metrics = tolerate(read_json(&dir.join(METRICS_FILE), expected(digests, METRICS_FILE)))?
        .unwrap_or_default();

    Ok(InferenceContext {
        encoder,
        scaler,
        classifiers,
        regressors,
        metrics,
    })
}

/// The degraded-load policy: a missing artifact is absorbed, every other
/// failure propagates.
fn tolerate<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::MissingArtifact(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Process-wide cache of the loaded context. A single lock makes loads
/// mutually exclusive; readers share the published `Arc` without blocking
/// each other.
#[derive(Debug, Default)]
pub struct ContextCache {
    slot: RwLock<Option<Arc<InferenceContext>>>,
}

impl ContextCache {
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// The cached context, if one has been published
    pub fn get(&self) -> Option<Arc<InferenceContext>> {
        self.slot.read().ok()?.clone()
    }

    /// Return the cached context or perform the one load that fills the
    /// cache. Concurrent callers serialize on the write lock; whichever
    /// arrives second finds the slot already filled.
    pub fn get_or_load(&self, dir: impl AsRef<Path>) -> Result<Arc<InferenceContext>> {
        if let Some(ctx) = self.get() {
            return Ok(ctx);
        }

        let mut slot = self
            .slot
            .write()
            .map_err(|_| Error::Internal("context cache lock poisoned".to_string()))?;
        if let Some(ctx) = slot.as_ref() {
            return Ok(Arc::clone(ctx));
        }

        let ctx = Arc::new(load(dir)?);
        *slot = Some(Arc::clone(&ctx));
        Ok(ctx)
    }

    /// Discard the cache and repeat the full load. The new context
    /// replaces the old one wholesale; in-flight readers keep their `Arc`.
    pub fn reload(&self, dir: impl AsRef<Path>) -> Result<Arc<InferenceContext>> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| Error::Internal("context cache lock poisoned".to_string()))?;
        let ctx = Arc::new(load(dir)?);
        *slot = Some(Arc::clone(&ctx));
        Ok(ctx)
    }

    /// Drop the cached context without loading a replacement
    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }
}

/// The default process-wide cache instance
pub fn global_cache() -> &'static ContextCache {
    static CACHE: ContextCache = ContextCache::new();
    &CACHE
}

fn expected<'a>(
    digests: Option<&'a BTreeMap<String, String>>,
    file: &str,
) -> Option<&'a str> {
    digests.and_then(|d| d.get(file)).map(String::as_str)
}

fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.as_ref().display())))?;
    fs::write(&path, &text)?;
    Ok(sha256_hex(text.as_bytes()))
}

/// Read and parse one artifact. An absent file is `MissingArtifact`; a
/// digest mismatch against the manifest is `ArtifactCorrupted`.
fn read_json<T: DeserializeOwned>(path: &Path, expected_digest: Option<&str>) -> Result<T> {
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    if !path.exists() {
        return Err(Error::MissingArtifact(file_name));
    }
    let text = fs::read_to_string(path)?;

    if let Some(expected) = expected_digest {
        if sha256_hex(text.as_bytes()) != expected {
            return Err(Error::ArtifactCorrupted(file_name));
        }
    }

    serde_json::from_str(&text)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(71);
    out.push_str("sha256-");
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
