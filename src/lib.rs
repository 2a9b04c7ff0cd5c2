//! Orientar: career-orientation recommendation engine
//!
//! The pipeline: a seeded [`synth::DatasetSynthesizer`] produces a labeled
//! corpus, [`encode::FeatureEncoder`] turns categorical profile attributes
//! into a fixed numeric feature vector, [`train::ModelTrainer`] fits an
//! ensemble of two area classifiers and two adequacy regressors,
//! [`registry`] persists and reloads the artifacts, and
//! [`predict::Predictor`] consolidates the per-model outputs into one
//! recommendation.

pub mod catalog;
pub mod cli;
pub mod encode;
pub mod error;
pub mod eval;
pub mod model;
pub mod predict;
pub mod profile;
pub mod registry;
pub mod synth;
pub mod train;

// Re-export key types for convenience
pub use catalog::{ExperienceTier, Objective, CAREER_AREAS, PROFESSIONS};
pub use encode::{FeatureEncoder, LabelCodebook, StandardScaler};
pub use error::{Error, Result};
pub use predict::{PredictionResult, Predictor, ScoreBand};
pub use profile::{ProfessionalProfile, ProfileInput, TrainingRecord};
pub use registry::{ContextCache, InferenceContext};
pub use synth::{DatasetSynthesizer, TrainingCorpus};
pub use train::{ModelTrainer, TrainedEnsemble, TrainerConfig};
