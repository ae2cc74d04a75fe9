use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeFormat {
    #[default]
    HoursMinutes,  // "38h 30m"
    Decimal,       // "38.5h"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClockFormat {
    #[default]
    Hour24,      // "14:30"
    Hour12,      // "2:30pm"
}

/// What happens to unsaved edits when another week is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeekChangePolicy {
    #[default]
    WarnAndDiscard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    pub company_id: String,
    pub employee_id: String,
    /// Overrides the branch found on the employee record.
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub time_format: TimeFormat,
    #[serde(default)]
    pub clock_format: ClockFormat,
    #[serde(default = "default_schedule_start_hour")]
    pub schedule_start_hour: u8,
    #[serde(default = "default_schedule_end_hour")]
    pub schedule_end_hour: u8,
    #[serde(default)]
    pub week_change_policy: WeekChangePolicy,
}

fn default_schedule_start_hour() -> u8 {
    6  // 6am
}

fn default_schedule_end_hour() -> u8 {
    22  // 10pm
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            api_token: None,
            company_id: String::new(),
            employee_id: String::new(),
            branch_id: None,
            font_scale: default_font_scale(),
            time_format: TimeFormat::default(),
            clock_format: ClockFormat::default(),
            schedule_start_hour: default_schedule_start_hour(),
            schedule_end_hour: default_schedule_end_hour(),
            week_change_policy: WeekChangePolicy::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.trim().is_empty()
            && !self.company_id.trim().is_empty()
            && !self.employee_id.trim().is_empty()
            && self.api_token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "shiftbox", "shiftbox")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// API root without trailing slashes; `https://` is assumed when no
    /// scheme is given.
    pub fn base_url(&self) -> String {
        let url = self.api_base_url.trim().trim_end_matches('/');
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }

    /// First and last visible grid hour, sanitized so the range is never empty.
    pub fn visible_hours(&self) -> (u8, u8) {
        let start = self.schedule_start_hour.min(23);
        let end = self.schedule_end_hour.clamp(start + 1, 24);
        (start, end)
    }
}
