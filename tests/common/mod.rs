#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INJECTED: &str = "@php artisan boost:update --ansi";

pub struct TestEnv {
    _tmp: TempDir,
    pub project: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let project = tmp.path().join("project");
        fs::create_dir_all(&project).expect("create project dir");

        make_fixture_sources(&project);
        let env = Self { _tmp: tmp, project };
        env.write_json(
            "composer.json",
            &json!({
                "name": "acme/app",
                "require": {"laravel/boost": "^1.0"},
                "scripts": {
                    "post-update-cmd": [
                        "@php artisan vendor:publish --tag=laravel-assets --ansi --force",
                        INJECTED
                    ]
                }
            }),
        );
        env
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("boostkit");
        cmd.env_remove("BOOSTKIT_LOG")
            .arg("--project-dir")
            .arg(&self.project);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error envelope")
    }

    pub fn run_text(&self, args: &[&str]) -> String {
        let out = self
            .cmd()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(out).expect("utf8 stdout")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.project.join(rel)
    }

    pub fn read_json(&self, rel: &str) -> Value {
        let raw = fs::read_to_string(self.path(rel)).expect("read json fixture");
        serde_json::from_str(&raw).expect("parse json fixture")
    }

    pub fn write_json(&self, rel: &str, value: &Value) {
        fs::write(
            self.path(rel),
            serde_json::to_string_pretty(value).expect("serialize fixture"),
        )
        .expect("write json fixture");
    }

    pub fn write_record(&self, agents: &[&str], skills: &[&str], packages: &[&str]) {
        self.write_json(
            "boost.json",
            &json!({"agents": agents, "skills": skills, "packages": packages}),
        );
    }
}

fn make_fixture_sources(project: &Path) {
    let source = project.join("resources/boost");
    for skill in ["valid-skill", "pest-testing"] {
        let dir = source.join("skills").join(skill);
        fs::create_dir_all(&dir).expect("create skill source");
        fs::write(dir.join("SKILL.md"), format!("# {skill}\n")).expect("write skill file");
    }
    let flux = source.join("packages/livewire/flux");
    fs::create_dir_all(&flux).expect("create package source");
    fs::write(flux.join("guidelines.md"), "# Flux\n").expect("write package file");
}
