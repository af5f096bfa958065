use crate::cli::{Cli, ScriptCommands};
use crate::domain::models::{CheckReport, ScriptReport, UninstallReport};
use crate::services::composer::ComposerScripts;
use crate::services::output::print_one;
use crate::services::settings::Settings;
use crate::services::signature::{CommandSignature, INJECTED_COMMAND};
use std::path::Path;

pub fn handle_script_commands(
    cli: &Cli,
    settings: &Settings,
    command: &ScriptCommands,
) -> anyhow::Result<()> {
    let signature = CommandSignature::boost_update();
    match command {
        ScriptCommands::Prune { file, hook } => {
            let path = cli
                .project_dir
                .join(file.as_deref().unwrap_or(&settings.script.file));
            let hook = hook.as_deref().unwrap_or(&settings.script.hook);
            let changed = ComposerScripts::new(&path, hook, signature).remove_injected_script()?;
            let report = ScriptReport {
                file: path.to_string_lossy().to_string(),
                hook: hook.to_string(),
                changed,
            };
            print_one(cli.json, report, |r| {
                if r.changed {
                    format!("removed {} from {} in {}", signature.verb(), r.hook, r.file)
                } else {
                    format!("no {} entry under {} in {}", signature.verb(), r.hook, r.file)
                }
            })?;
        }
        ScriptCommands::Add {
            file,
            hook,
            command,
        } => {
            let path = cli
                .project_dir
                .join(file.as_deref().unwrap_or(&settings.script.file));
            let hook = hook.as_deref().unwrap_or(&settings.script.hook);
            let command = command.as_deref().unwrap_or(INJECTED_COMMAND);
            if !signature.matches(command) {
                anyhow::bail!(
                    "refusing to add {command:?}: it would not be recognized as {}",
                    signature.verb()
                );
            }
            let changed =
                ComposerScripts::new(&path, hook, signature).ensure_injected_script(command)?;
            let report = ScriptReport {
                file: path.to_string_lossy().to_string(),
                hook: hook.to_string(),
                changed,
            };
            print_one(cli.json, report, |r| {
                if r.changed {
                    format!("added {} to {} in {}", command, r.hook, r.file)
                } else {
                    format!(
                        "{} already present under {} in {}",
                        signature.verb(),
                        r.hook,
                        r.file
                    )
                }
            })?;
        }
        ScriptCommands::Check { command } => {
            let report = CheckReport {
                command: command.clone(),
                verb: signature.verb().to_string(),
                matches: signature.matches(command),
            };
            print_one(cli.json, report, |r| {
                if r.matches {
                    format!("match\t{}", r.command)
                } else {
                    format!("no match\t{}", r.command)
                }
            })?;
        }
    }
    Ok(())
}

/// Stand-in for the package manager's pre-uninstall hook.
///
/// Never returns an error for script problems: the host uninstall must proceed.
pub fn handle_uninstall(
    cli: &Cli,
    settings: &Settings,
    package: Option<&str>,
) -> anyhow::Result<()> {
    let package = package.unwrap_or(&settings.install.package);
    if package != settings.install.package {
        tracing::debug!(package, "not the managed package, nothing to do");
        if cli.json {
            print_one(true, uninstall_report(package, "skipped", None), |_| String::new())?;
        }
        return Ok(());
    }

    let path = cli.project_dir.join(&settings.script.file);
    let file_name = display_name(&path);
    let signature = CommandSignature::boost_update();
    say(cli, &format!("Removing {} script from {}...", signature.verb(), file_name));

    if !path.exists() {
        tracing::warn!(path = %path.display(), "script file missing");
        let message = format!("{file_name} not found, skipping script removal");
        if cli.json {
            print_one(true, uninstall_report(package, "missing", Some(message)), |_| {
                String::new()
            })?;
        } else {
            eprintln!("{message}");
        }
        return Ok(());
    }

    let scripts = ComposerScripts::new(&path, &settings.script.hook, signature);
    let report = match scripts.remove_injected_script() {
        Ok(true) => {
            say(
                cli,
                &format!(
                    "Successfully removed {} script from {}",
                    signature.verb(),
                    file_name
                ),
            );
            uninstall_report(package, "removed", None)
        }
        Ok(false) => {
            say(
                cli,
                &format!("{} script not found in {}", signature.verb(), file_name),
            );
            uninstall_report(package, "not_found", None)
        }
        Err(err) => {
            tracing::warn!(code = err.code(), error = %err, "script removal failed");
            let message = format!("Failed to remove {} script: {}", signature.verb(), err);
            if !cli.json {
                eprintln!("{message}");
            }
            uninstall_report(package, "failed", Some(message))
        }
    };

    if cli.json {
        print_one(true, report, |_| String::new())?;
    }
    Ok(())
}

fn say(cli: &Cli, line: &str) {
    if !cli.json {
        println!("{line}");
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn uninstall_report(package: &str, status: &str, message: Option<String>) -> UninstallReport {
    UninstallReport {
        package: package.to_string(),
        status: status.to_string(),
        message,
    }
}
