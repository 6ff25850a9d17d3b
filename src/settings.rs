use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Host-tunable pipeline behavior, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineSettings {
    /// Prompt sent with every capture request.
    pub prompt: String,
    /// Appended to the prompt, typically a length constraint.
    pub prompt_suffix: String,
    /// Interval of the timed dispatch loop, in seconds.
    pub timed_interval_secs: u64,
    /// When true, a dispatch is skipped while another inference is still in
    /// flight. Off by default: manual and timed dispatches may overlap.
    pub single_flight: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            prompt: "请用中文简要描述画面。".into(),
            prompt_suffix: "字数不超过15字。".into(),
            timed_interval_secs: 30,
            single_flight: false,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<PipelineSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            PipelineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> PipelineSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: PipelineSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &PipelineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
