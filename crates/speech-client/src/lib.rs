pub mod boosting;
pub mod client;
pub mod correction;
pub mod error;

pub use boosting::{BoostingVocabulary, MAX_BOOSTING_WORDS};
pub use client::{RecognizeParams, RecognizeResponse, Segment, SpeechClient};
pub use correction::{CorrectionStoreError, CorrectionTable};
pub use error::{Result, SpeechError};
