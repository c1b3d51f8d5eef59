//! Shared fixtures: a pipeline output tree under a temporary directory

use chrono::NaiveDate;
use obsmon::MonitorConfig;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;

pub const NIGHT: &str = "2025-01-01";

pub fn night() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

pub struct PipelineTree {
    pub temp: TempDir,
    pub config: MonitorConfig,
}

impl PipelineTree {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = MonitorConfig::rooted(temp.path());
        fs::create_dir_all(&config.data_root).unwrap();
        fs::create_dir_all(&config.masterframe_root).unwrap();
        fs::create_dir_all(&config.comments_root).unwrap();
        Self { temp, config }
    }

    /// Science unit whose first `completed` stages are flagged done
    pub fn science_unit(&self, object: &str, filter: &str, completed: usize) -> PathBuf {
        let dir = self.config.data_root.join(NIGHT).join(object).join(filter);
        fs::create_dir_all(&dir).unwrap();

        let mut yaml = format!("name: {object}\nflag:\n");
        for (i, stage) in self.config.stages.iter().enumerate() {
            yaml.push_str(&format!("  {stage}: {}\n", i < completed));
        }
        let config = dir.join(format!("{object}_{filter}.yml"));
        fs::write(&config, yaml).unwrap();
        set_mtime(&config, 1_000);
        dir
    }

    pub fn masterframe_unit(&self, unit: &str, files: &[&str]) -> PathBuf {
        let dir = self.config.masterframe_root.join(NIGHT).join(unit);
        fs::create_dir_all(&dir).unwrap();
        for name in files {
            fs::write(dir.join(name), "").unwrap();
            set_mtime(&dir.join(name), 1_000);
        }
        dir
    }

    pub fn write(&self, path: &Path, content: &str, mtime: u64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        set_mtime(path, mtime);
    }
}

pub fn set_mtime(path: &Path, secs: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}
