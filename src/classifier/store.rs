use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ClassifierError;
use crate::ledger::KnownCategory;
use crate::utils::persistence::write_atomic;

use super::pipeline::{ClassifierPipeline, TrainingExample};

pub const MODEL_SCHEMA_VERSION: u32 = 1;

/// On-disk form of a trained pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub trained_at: DateTime<Utc>,
    pub example_count: usize,
    pub pipeline: ClassifierPipeline,
}

/// Persists the trained classifier as one artifact file and serves predictions from it.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Fits a pipeline on `examples` and replaces the stored artifact with it.
    pub fn train(&self, examples: &[TrainingExample]) -> Result<ClassifierPipeline, ClassifierError> {
        let pipeline = ClassifierPipeline::train(examples)?;
        let artifact = ModelArtifact {
            schema_version: MODEL_SCHEMA_VERSION,
            trained_at: Utc::now(),
            example_count: examples.len(),
            pipeline,
        };
        let json = serde_json::to_vec_pretty(&artifact)?;
        write_atomic(&self.path, &json)?;
        tracing::info!(
            path = %self.path.display(),
            examples = examples.len(),
            "classifier trained"
        );
        Ok(artifact.pipeline)
    }

    /// Reads the stored artifact.
    ///
    /// A missing, unreadable, or newer-format artifact is reported as
    /// [`ClassifierError::ModelUnavailable`].
    pub fn load(&self) -> Result<ModelArtifact, ClassifierError> {
        let unavailable =
            |reason: String| ClassifierError::ModelUnavailable(format!("{}: {reason}", self.path.display()));
        let data = fs::read(&self.path).map_err(|err| unavailable(err.to_string()))?;
        let artifact: ModelArtifact =
            serde_json::from_slice(&data).map_err(|err| unavailable(err.to_string()))?;
        if artifact.schema_version > MODEL_SCHEMA_VERSION {
            return Err(unavailable(format!(
                "schema version {} is newer than supported {}",
                artifact.schema_version, MODEL_SCHEMA_VERSION
            )));
        }
        Ok(artifact)
    }

    /// Loads the artifact and predicts the category of `description`.
    pub fn predict(&self, description: &str) -> Result<KnownCategory, ClassifierError> {
        self.load()?.pipeline.predict(description)
    }

    /// Loads the artifact and ranks every known label for `description`.
    pub fn rank(&self, description: &str) -> Result<Vec<(KnownCategory, f64)>, ClassifierError> {
        Ok(self.load()?.pipeline.rank(description))
    }
}
