//! Feature encoding: codebooks, the profile encoder, and the scaler

mod codebook;
mod encoder;
mod scaler;

pub use codebook::{LabelCodebook, FALLBACK_CODE};
pub use encoder::{EncodedProfile, FeatureEncoder, FEATURE_COUNT, FEATURE_NAMES};
pub use scaler::StandardScaler;
