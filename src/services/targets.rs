use crate::cli::AgentTarget;
use crate::domain::models::TargetInfo;
use crate::services::reconcile::{RemovalError, SkillTarget};
use crate::services::settings::Settings;
use crate::services::storage::{
    atomic_write, bindings_dir, is_managed, materialize, packages_dir,
};
use std::path::{Path, PathBuf};

impl AgentTarget {
    pub const ALL: [AgentTarget; 4] = [
        AgentTarget::Claude,
        AgentTarget::Codex,
        AgentTarget::Cursor,
        AgentTarget::Gemini,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            AgentTarget::Claude => "claude",
            AgentTarget::Codex => "codex",
            AgentTarget::Cursor => "cursor",
            AgentTarget::Gemini => "gemini",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentTarget::Claude => "Claude Code",
            AgentTarget::Codex => "Codex",
            AgentTarget::Cursor => "Cursor",
            AgentTarget::Gemini => "Gemini CLI",
        }
    }

    fn default_skills_dir(self) -> &'static str {
        match self {
            AgentTarget::Claude => ".claude/skills",
            AgentTarget::Codex => ".codex/skills",
            AgentTarget::Cursor => ".cursor/skills",
            AgentTarget::Gemini => ".gemini/skills",
        }
    }

    pub fn skills_dir(self, project_dir: &Path, settings: &Settings) -> PathBuf {
        let rel = settings
            .skills_dir_override(self.slug())
            .unwrap_or_else(|| Path::new(self.default_skills_dir()));
        project_dir.join(rel)
    }
}

/// A single path segment: no separators, not `.`/`..`, not empty.
pub fn validate_segment(name: &str) -> Result<(), RemovalError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(RemovalError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn remove_managed_dir(dir: &Path) -> Result<(), RemovalError> {
    if !dir.exists() {
        return Ok(());
    }
    if !is_managed(dir) {
        return Err(RemovalError::Unmanaged(dir.to_path_buf()));
    }
    std::fs::remove_dir_all(dir).map_err(|source| RemovalError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Skill directory of one agent inside the project.
pub struct FsSkillTarget {
    agent: AgentTarget,
    skills_dir: PathBuf,
}

impl FsSkillTarget {
    pub fn new(agent: AgentTarget, project_dir: &Path, settings: &Settings) -> Self {
        Self {
            agent,
            skills_dir: agent.skills_dir(project_dir, settings),
        }
    }

    pub fn install_skill(&self, name: &str, source: &Path) -> anyhow::Result<PathBuf> {
        validate_segment(name)?;
        let dst = self.skills_dir.join(name);
        materialize(source, &dst)?;
        tracing::debug!(
            skill = name,
            agent = self.agent.slug(),
            path = %dst.display(),
            "installed skill"
        );
        Ok(dst)
    }
}

impl SkillTarget for FsSkillTarget {
    fn label(&self) -> &str {
        self.agent.label()
    }

    fn remove_skill(&self, name: &str) -> Result<(), RemovalError> {
        validate_segment(name)?;
        remove_managed_dir(&self.skills_dir.join(name))
    }
}

/// `vendor/name` → `<project>/.boost/packages/vendor/name`.
pub fn package_dir(project_dir: &Path, id: &str) -> Result<PathBuf, RemovalError> {
    let Some((vendor, name)) = id.split_once('/') else {
        return Err(RemovalError::InvalidName(id.to_string()));
    };
    if validate_segment(vendor).is_err() || validate_segment(name).is_err() {
        return Err(RemovalError::InvalidName(id.to_string()));
    }
    Ok(packages_dir(project_dir).join(vendor).join(name))
}

pub fn install_package(project_dir: &Path, id: &str, source: &Path) -> anyhow::Result<PathBuf> {
    let dst = package_dir(project_dir, id)?;
    materialize(source, &dst)?;
    Ok(dst)
}

pub fn remove_package(project_dir: &Path, id: &str) -> Result<(), RemovalError> {
    remove_managed_dir(&package_dir(project_dir, id)?)
}

fn binding_path(project_dir: &Path, slug: &str) -> Result<PathBuf, RemovalError> {
    validate_segment(slug)?;
    Ok(bindings_dir(project_dir).join(format!("{slug}.json")))
}

pub fn write_binding(
    project_dir: &Path,
    target: &FsSkillTarget,
    skills: &[String],
) -> anyhow::Result<()> {
    let path = binding_path(project_dir, target.agent.slug())?;
    let binding = serde_json::json!({
        "managedBy": "boostkit",
        "agent": target.agent.slug(),
        "skills_dir": target.skills_dir,
        "skills": skills,
    });
    atomic_write(&path, &serde_json::to_string_pretty(&binding)?)?;
    Ok(())
}

pub fn remove_binding(project_dir: &Path, slug: &str) -> Result<(), RemovalError> {
    let path = binding_path(project_dir, slug)?;
    if !path.exists() {
        return Ok(());
    }
    let io_err = |source| RemovalError::Io {
        path: path.clone(),
        source,
    };
    let raw = std::fs::read_to_string(&path).map_err(io_err)?;
    let managed = serde_json::from_str::<serde_json::Value>(&raw)
        .ok()
        .and_then(|v| v.get("managedBy").and_then(|m| m.as_str()).map(|m| m == "boostkit"))
        .unwrap_or(false);
    if !managed {
        return Err(RemovalError::Unmanaged(path));
    }
    std::fs::remove_file(&path).map_err(io_err)
}

pub fn describe_targets(project_dir: &Path, settings: &Settings) -> Vec<TargetInfo> {
    AgentTarget::ALL
        .iter()
        .map(|agent| {
            let dir = agent.skills_dir(project_dir, settings);
            TargetInfo {
                agent: agent.slug().to_string(),
                label: agent.label().to_string(),
                skills_dir: dir.to_string_lossy().to_string(),
                status: if dir.exists() { "ok" } else { "missing" }.to_string(),
            }
        })
        .collect()
}
