use thiserror::Error;

// ============================================================================
// QUALITY CLASSES
// ============================================================================

/// Fixed quality tiers reported by the classifier. The id/label mapping is
/// constant for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityClass {
    VeryGood,
    Good,
    Average,
    Poor,
}

impl QualityClass {
    pub fn as_id(&self) -> u8 {
        match self {
            QualityClass::VeryGood => 0,
            QualityClass::Good => 1,
            QualityClass::Average => 2,
            QualityClass::Poor => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityClass::VeryGood => "very good",
            QualityClass::Good => "good",
            QualityClass::Average => "average",
            QualityClass::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub class: QualityClass,
    pub confidence: f32,
}

/// Summary statistics over one signal window. Min and max are reported for
/// inspection but do not participate in the grading rules.
#[derive(Debug, Clone, Copy)]
pub struct SignalStats {
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub distortion_ratio: f32,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("signal must contain {expected} data points, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
