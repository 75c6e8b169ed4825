use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    AlreadyAvailable { renderer: String },
    Installable { reason: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDiag {
    pub provider: String,
    pub python_exe: String,
    pub install_enabled: bool,
    pub install_command: Vec<String>,
    pub availability: Availability,
}
