use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "boostkit.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub script: ScriptSettings,
    #[serde(default)]
    pub install: InstallSettings,
    #[serde(default)]
    pub targets: BTreeMap<String, TargetSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    pub file: PathBuf,
    pub hook: String,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("composer.json"),
            hook: "post-update-cmd".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    /// Composer package whose removal triggers `uninstall`.
    pub package: String,
    pub record: PathBuf,
    pub source: PathBuf,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            package: "laravel/boost".to_string(),
            record: PathBuf::from("boost.json"),
            source: PathBuf::from("resources/boost"),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct TargetSettings {
    pub skills_dir: Option<PathBuf>,
}

/// Loads `boostkit.toml` from the project, or from `explicit` when given.
///
/// A missing project file yields defaults; a missing explicit file is an error.
pub fn load_settings(project_dir: &Path, explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("settings file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => project_dir.join(SETTINGS_FILE),
    };
    if !path.exists() {
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    let settings: Settings = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid settings in {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

impl Settings {
    pub fn skills_dir_override(&self, slug: &str) -> Option<&Path> {
        self.targets.get(slug).and_then(|t| t.skills_dir.as_deref())
    }
}
