use crate::services::reconcile::CleanupReport;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Persisted selection of the last successful `sync` (`boost.json`).
///
/// Keys this tool does not own are carried through untouched.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct InstallRecord {
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
pub struct ScriptReport {
    pub file: String,
    pub hook: String,
    pub changed: bool,
}

#[derive(Serialize)]
pub struct CheckReport {
    pub command: String,
    pub verb: String,
    pub matches: bool,
}

#[derive(Serialize)]
pub struct UninstallReport {
    pub package: String,
    pub status: String,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct StaleReport {
    pub skills: Vec<String>,
    pub packages: Vec<String>,
    pub agents: Vec<String>,
}

#[derive(Serialize)]
pub struct SyncReport {
    pub agents: Vec<String>,
    pub installed_skills: Vec<String>,
    pub installed_packages: Vec<String>,
    pub skipped: Vec<String>,
    pub cleanup: Vec<CleanupReport>,
    pub failure_count: usize,
}

#[derive(Serialize)]
pub struct TargetInfo {
    pub agent: String,
    pub label: String,
    pub skills_dir: String,
    pub status: String,
}
