#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestRoot {
    dir: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_json(&self, rel_path: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.dir.path().join(rel_path))?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn tasks(&self) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
        match self.read_json("data/tasks.json")? {
            Value::Array(items) => Ok(items),
            other => Err(format!("tasks.json is not an array: {other}").into()),
        }
    }

    pub fn technicians(&self) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
        match self.read_json("data/technicians.json")? {
            Value::Array(items) => Ok(items),
            other => Err(format!("technicians.json is not an array: {other}").into()),
        }
    }

    /// Binary invocation rooted at this directory, isolated from the caller's env.
    pub fn cmd(&self) -> Command {
        let mut cmd = svctrack_cmd();
        cmd.current_dir(self.dir.path())
            .env_remove("SVCTRACK_CONFIG")
            .env("SVCTRACK_ROOT", self.dir.path());
        cmd
    }

    /// Run with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.cmd().arg("--json").args(args).output()?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

pub fn svctrack_cmd() -> Command {
    let mut cmd = Command::cargo_bin("svctrack").expect("binary");
    cmd.env_remove("SVCTRACK_ROOT")
        .env_remove("SVCTRACK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}
