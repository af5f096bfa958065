use crate::cli::{AgentTarget, Cli, Commands, Selection};
use crate::domain::models::{InstallRecord, StaleReport, SyncReport};
use crate::services::output::{print_one, print_out};
use crate::services::reconcile::{
    reconcile_untargeted, ArtifactKind, InstallationState, SkillTarget, StaleSkillReconciler,
    Tracked,
};
use crate::services::settings::Settings;
use crate::services::storage::{load_record, save_record};
use crate::services::targets::{
    describe_targets, install_package, remove_binding, remove_package, validate_segment,
    write_binding, FsSkillTarget,
};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn handle_install_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Sync { selection } => sync(cli, settings, selection)?,
        Commands::Stale { selection } => {
            let plan = Plan::resolve(&cli.project_dir, settings, selection)?;
            let state = plan.state();
            let report = StaleReport {
                skills: state.skills.stale(),
                packages: state.packages.stale(),
                agents: state.agents.stale(),
            };
            print_one(cli.json, report, |r| {
                let mut lines = Vec::new();
                for (kind, items) in [
                    ("skill", &r.skills),
                    ("package", &r.packages),
                    ("agent", &r.agents),
                ] {
                    lines.extend(items.iter().map(|i| format!("{kind}\t{i}")));
                }
                if lines.is_empty() {
                    "nothing stale".to_string()
                } else {
                    lines.join("\n")
                }
            })?;
        }
        Commands::Targets => {
            let targets = describe_targets(&cli.project_dir, settings);
            print_out(cli.json, &targets, |t| {
                format!("{}\t{}\t{}\t{}", t.agent, t.label, t.skills_dir, t.status)
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Selection resolved against the install source and the previous record.
struct Plan {
    record_path: PathBuf,
    record: InstallRecord,
    agents: Vec<AgentTarget>,
    skills: Vec<(String, PathBuf)>,
    packages: Vec<(String, PathBuf)>,
    skipped: Vec<String>,
}

impl Plan {
    fn resolve(
        project_dir: &Path,
        settings: &Settings,
        selection: &Selection,
    ) -> anyhow::Result<Self> {
        let record_path = project_dir.join(&settings.install.record);
        let record = load_record(&record_path)?;
        let source_root = project_dir.join(&settings.install.source);

        let mut agents = Vec::new();
        for agent in &selection.agents {
            if !agents.contains(agent) {
                agents.push(*agent);
            }
        }

        let mut skipped = Vec::new();
        let mut skills = Vec::new();
        for name in dedupe(&selection.skills) {
            match skill_source(&source_root, &name) {
                Some(src) => skills.push((name, src)),
                None => {
                    tracing::warn!(skill = %name, "skill source not found, skipping");
                    skipped.push(format!("skill {name}"));
                }
            }
        }
        let mut packages = Vec::new();
        for id in dedupe(&selection.packages) {
            match package_source(&source_root, &id) {
                Some(src) => packages.push((id, src)),
                None => {
                    tracing::warn!(package = %id, "package source not found, skipping");
                    skipped.push(format!("package {id}"));
                }
            }
        }

        Ok(Self {
            record_path,
            record,
            agents,
            skills,
            packages,
            skipped,
        })
    }

    fn state(&self) -> InstallationState {
        InstallationState {
            skills: Tracked::new(
                self.record.skills.clone(),
                self.skills.iter().map(|(n, _)| n.clone()).collect(),
            ),
            packages: Tracked::new(
                self.record.packages.clone(),
                self.packages.iter().map(|(n, _)| n.clone()).collect(),
            ),
            agents: Tracked::new(
                self.record.agents.clone(),
                self.agents.iter().map(|a| a.slug().to_string()).collect(),
            ),
        }
    }
}

fn sync(cli: &Cli, settings: &Settings, selection: &Selection) -> anyhow::Result<()> {
    let project_dir = &cli.project_dir;
    let mut plan = Plan::resolve(project_dir, settings, selection)?;
    let targets: Vec<FsSkillTarget> = plan
        .agents
        .iter()
        .map(|a| FsSkillTarget::new(*a, project_dir, settings))
        .collect();

    let mut installed_skills = Vec::new();
    for (name, src) in &plan.skills {
        let mut ok = true;
        for target in &targets {
            if let Err(err) = target.install_skill(name, src) {
                tracing::warn!(
                    skill = %name,
                    agent = target.label(),
                    error = %err,
                    "skill install failed"
                );
                plan.skipped.push(format!("skill {name} for {}: {err}", target.label()));
                ok = false;
            }
        }
        if ok {
            installed_skills.push(name.clone());
        }
    }

    let mut installed_packages = Vec::new();
    for (id, src) in &plan.packages {
        match install_package(project_dir, id, src) {
            Ok(_) => installed_packages.push(id.clone()),
            Err(err) => {
                tracing::warn!(package = %id, error = %err, "package install failed");
                plan.skipped.push(format!("package {id}: {err}"));
            }
        }
    }

    for target in &targets {
        write_binding(project_dir, target, &installed_skills)?;
    }

    // A selected skill that failed on one target stays tracked and is never stale.
    let mut state = plan.state();
    state.packages.current = installed_packages.clone();
    let agents = state.agents.current.clone();

    let mut stdout = std::io::stdout();
    let mut sink = std::io::sink();
    let out: &mut dyn Write = if cli.json { &mut sink } else { &mut stdout };

    let skill_targets: Vec<&dyn SkillTarget> =
        targets.iter().map(|t| t as &dyn SkillTarget).collect();
    let cleanup = vec![
        StaleSkillReconciler::new(
            state.skills.previous.clone(),
            state.skills.current.clone(),
            skill_targets,
        )
        .run(out),
        reconcile_untargeted(
            ArtifactKind::Package,
            &state.packages,
            |id| remove_package(project_dir, id),
            out,
        ),
        reconcile_untargeted(
            ArtifactKind::Agent,
            &state.agents,
            |slug| remove_binding(project_dir, slug),
            out,
        ),
    ];

    plan.record.agents = agents.clone();
    plan.record.skills = state.skills.current.clone();
    plan.record.packages = installed_packages.clone();
    save_record(&plan.record_path, &plan.record)?;
    tracing::info!(path = %plan.record_path.display(), "install record updated");

    let failure_count = cleanup.iter().map(|c| c.failure_count()).sum();
    let report = SyncReport {
        agents,
        installed_skills,
        installed_packages,
        skipped: plan.skipped,
        cleanup,
        failure_count,
    };
    print_one(cli.json, report, |r| {
        let mut lines: Vec<String> = r.skipped.iter().map(|s| format!("skipped {s}")).collect();
        lines.push(format!(
            "synced {} skill(s) and {} package(s) for [{}]",
            r.installed_skills.len(),
            r.installed_packages.len(),
            r.agents.join(", ")
        ));
        lines.join("\n")
    })?;
    Ok(())
}

fn dedupe(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|i| seen.insert(i.as_str()))
        .cloned()
        .collect()
}

fn skill_source(root: &Path, name: &str) -> Option<PathBuf> {
    validate_segment(name).ok()?;
    let dir = root.join("skills").join(name);
    dir.is_dir().then_some(dir)
}

fn package_source(root: &Path, id: &str) -> Option<PathBuf> {
    let (vendor, name) = id.split_once('/')?;
    validate_segment(vendor).ok()?;
    validate_segment(name).ok()?;
    let dir = root.join("packages").join(vendor).join(name);
    dir.is_dir().then_some(dir)
}
