//! Confidence Calibrator Module
//!
//! Bands a single-stock recommendation into High / Medium / Low confidence
//! from its score and the number of red flags and profile mismatches behind
//! it, and turns the band into a conviction label.

pub mod calibrator;
pub mod conviction;

pub use calibrator::{confidence_band, ConfidenceCalibrator};
pub use conviction::{conviction_label, ConvictionLabel};
