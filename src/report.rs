use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Converted,
    CapabilityUnavailable,
    ConversionFailed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Converted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: Outcome,
    pub input: String,
    pub output: String,
    pub renderer: Option<String>,
    pub output_bytes: Option<u64>,
    pub output_sha256: Option<String>,
    pub started: String,
    pub finished: String,
}
