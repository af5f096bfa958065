use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RemovalError {
    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),
    #[error("{} is not managed by boostkit", .0.display())]
    Unmanaged(PathBuf),
    #[error("failed to remove {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An installation destination that can drop a skill it previously received.
pub trait SkillTarget {
    fn label(&self) -> &str;
    fn remove_skill(&self, name: &str) -> Result<(), RemovalError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Skill,
    Package,
    Agent,
}

impl ArtifactKind {
    pub fn noun(self) -> &'static str {
        match self {
            ArtifactKind::Skill => "skill",
            ArtifactKind::Package => "package",
            ArtifactKind::Agent => "agent",
        }
    }
}

/// Previously tracked vs. currently selected identifiers for one artifact category.
#[derive(Debug, Clone, Default)]
pub struct Tracked {
    pub previous: Vec<String>,
    pub current: Vec<String>,
}

impl Tracked {
    pub fn new(previous: Vec<String>, current: Vec<String>) -> Self {
        Self { previous, current }
    }

    pub fn stale(&self) -> Vec<String> {
        stale_items(&self.previous, &self.current)
    }
}

/// Per-category tracking for one installer run.
#[derive(Debug, Clone, Default)]
pub struct InstallationState {
    pub skills: Tracked,
    pub packages: Tracked,
    pub agents: Tracked,
}

/// `previous - current`, in `previous` order, without duplicates.
pub fn stale_items(previous: &[String], current: &[String]) -> Vec<String> {
    let current: HashSet<&str> = current.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    previous
        .iter()
        .filter(|p| !current.contains(p.as_str()) && seen.insert(p.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovalFailure {
    pub item: String,
    pub target: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub kind: ArtifactKind,
    pub stale: Vec<String>,
    pub attempted: usize,
    pub failures: Vec<RemovalFailure>,
}

impl CleanupReport {
    fn new(kind: ArtifactKind, stale: Vec<String>) -> Self {
        Self {
            kind,
            stale,
            attempted: 0,
            failures: Vec::new(),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Removes skills that a previous run tracked but the current run did not install,
/// from every selected target.
pub struct StaleSkillReconciler<'a> {
    previously_tracked: Vec<String>,
    installed: Vec<String>,
    targets: Vec<&'a dyn SkillTarget>,
}

impl<'a> StaleSkillReconciler<'a> {
    pub fn new(
        previously_tracked: Vec<String>,
        installed: Vec<String>,
        targets: Vec<&'a dyn SkillTarget>,
    ) -> Self {
        Self {
            previously_tracked,
            installed,
            targets,
        }
    }

    pub fn stale(&self) -> Vec<String> {
        stale_items(&self.previously_tracked, &self.installed)
    }

    /// Attempts every (stale skill, target) pair. Failures are written to `out`,
    /// counted, and never abort the remaining pairs.
    pub fn run(&self, out: &mut dyn Write) -> CleanupReport {
        let mut report = CleanupReport::new(ArtifactKind::Skill, self.stale());

        for skill in &report.stale {
            for target in &self.targets {
                report.attempted += 1;
                let Err(err) = target.remove_skill(skill) else {
                    tracing::debug!(skill = %skill, agent = target.label(), "removed stale skill");
                    continue;
                };
                tracing::warn!(
                    skill = %skill,
                    agent = target.label(),
                    error = %err,
                    "stale skill removal failed"
                );
                let _ = writeln!(
                    out,
                    "Failed to remove stale skill {} for {}.",
                    skill,
                    target.label()
                );
                report.failures.push(RemovalFailure {
                    item: skill.clone(),
                    target: Some(target.label().to_string()),
                    reason: err.to_string(),
                });
            }
        }

        write_summary(&report, out);
        report
    }
}

/// Single removal per stale identifier, for categories that are not fanned out
/// across targets (packages, agent bindings).
pub fn reconcile_untargeted(
    kind: ArtifactKind,
    tracked: &Tracked,
    mut remove: impl FnMut(&str) -> Result<(), RemovalError>,
    out: &mut dyn Write,
) -> CleanupReport {
    let mut report = CleanupReport::new(kind, tracked.stale());

    for item in &report.stale {
        report.attempted += 1;
        if let Err(err) = remove(item) {
            tracing::warn!(kind = kind.noun(), item = %item, error = %err, "stale removal failed");
            let _ = writeln!(out, "Failed to remove stale {} {}.", kind.noun(), item);
            report.failures.push(RemovalFailure {
                item: item.clone(),
                target: None,
                reason: err.to_string(),
            });
        }
    }

    write_summary(&report, out);
    report
}

fn write_summary(report: &CleanupReport, out: &mut dyn Write) {
    let n = report.failure_count();
    if n == 0 {
        return;
    }
    let _ = writeln!(
        out,
        "Stale {} cleanup finished with {} failure{}.",
        report.kind.noun(),
        n,
        if n == 1 { "" } else { "s" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeTarget {
        label: &'static str,
        failing: Vec<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTarget {
        fn new(label: &'static str, failing: &[&'static str]) -> Self {
            Self {
                label,
                failing: failing.to_vec(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SkillTarget for FakeTarget {
        fn label(&self) -> &str {
            self.label
        }

        fn remove_skill(&self, name: &str) -> Result<(), RemovalError> {
            self.calls.borrow_mut().push(name.to_string());
            if self.failing.iter().any(|f| *f == name) {
                return Err(RemovalError::InvalidName(name.to_string()));
            }
            Ok(())
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn stale_items_keep_previous_order_and_drop_duplicates() {
        let stale = stale_items(&names(&["c", "a", "b", "a", "d"]), &names(&["b"]));
        assert_eq!(stale, names(&["c", "a", "d"]));
    }

    #[test]
    fn one_failing_target_reports_line_and_singular_summary() {
        let codex = FakeTarget::new("Codex", &["invalid/skill"]);
        let reconciler = StaleSkillReconciler::new(
            names(&["valid-skill", "invalid/skill"]),
            names(&["valid-skill"]),
            vec![&codex],
        );

        let mut buf = Vec::new();
        let report = reconciler.run(&mut buf);

        assert_eq!(
            output(buf),
            "Failed to remove stale skill invalid/skill for Codex.\n\
             Stale skill cleanup finished with 1 failure.\n"
        );
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.failures[0].target.as_deref(), Some("Codex"));
        assert_eq!(*codex.calls.borrow(), names(&["invalid/skill"]));
    }

    #[test]
    fn nothing_stale_means_no_calls_and_no_output() {
        let codex = FakeTarget::new("Codex", &[]);
        let reconciler =
            StaleSkillReconciler::new(names(&["a", "b"]), names(&["b", "a"]), vec![&codex]);

        let mut buf = Vec::new();
        let report = reconciler.run(&mut buf);

        assert!(buf.is_empty());
        assert_eq!(report.attempted, 0);
        assert!(codex.calls.borrow().is_empty());
    }

    #[test]
    fn every_failing_pair_is_reported_and_counted() {
        let claude = FakeTarget::new("Claude Code", &["old-a", "old-b"]);
        let codex = FakeTarget::new("Codex", &["old-b"]);
        let cursor = FakeTarget::new("Cursor", &[]);
        let reconciler = StaleSkillReconciler::new(
            names(&["old-a", "kept", "old-b"]),
            names(&["kept"]),
            vec![&claude, &codex, &cursor],
        );

        let mut buf = Vec::new();
        let report = reconciler.run(&mut buf);
        let text = output(buf);

        assert_eq!(report.attempted, 6);
        assert_eq!(report.failure_count(), 3);
        assert!(text.contains("Failed to remove stale skill old-a for Claude Code."));
        assert!(text.contains("Failed to remove stale skill old-b for Claude Code."));
        assert!(text.contains("Failed to remove stale skill old-b for Codex."));
        assert!(text.ends_with("Stale skill cleanup finished with 3 failures.\n"));
        assert_eq!(*cursor.calls.borrow(), names(&["old-a", "old-b"]));
    }

    #[test]
    fn kept_skills_are_never_attempted() {
        let codex = FakeTarget::new("Codex", &[]);
        let reconciler = StaleSkillReconciler::new(
            names(&["kept", "gone"]),
            names(&["kept", "new"]),
            vec![&codex],
        );

        let mut buf = Vec::new();
        let report = reconciler.run(&mut buf);

        assert!(buf.is_empty());
        assert_eq!(report.stale, names(&["gone"]));
        assert!(!codex.calls.borrow().iter().any(|c| c == "kept"));
    }

    #[test]
    fn untargeted_removal_is_single_call_per_item() {
        let tracked = Tracked::new(
            names(&["vendor/a", "vendor/b", "vendor/c"]),
            names(&["vendor/b"]),
        );
        let mut calls = Vec::new();
        let mut buf = Vec::new();

        let report = reconcile_untargeted(
            ArtifactKind::Package,
            &tracked,
            |item| {
                calls.push(item.to_string());
                if item == "vendor/c" {
                    Err(RemovalError::InvalidName(item.to_string()))
                } else {
                    Ok(())
                }
            },
            &mut buf,
        );

        assert_eq!(calls, names(&["vendor/a", "vendor/c"]));
        assert_eq!(report.failure_count(), 1);
        assert_eq!(
            output(buf),
            "Failed to remove stale package vendor/c.\n\
             Stale package cleanup finished with 1 failure.\n"
        );
    }

    #[test]
    fn running_twice_repeats_the_same_report() {
        let codex = FakeTarget::new("Codex", &["x"]);
        let reconciler = StaleSkillReconciler::new(names(&["x"]), vec![], vec![&codex]);

        let first = reconciler.run(&mut std::io::sink());
        let second = reconciler.run(&mut std::io::sink());

        assert_eq!(first.failure_count(), 1);
        assert_eq!(second.failure_count(), 1);
    }
}
