use std::{env, path::PathBuf};

use color_eyre::{Result, eyre::Context};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

pub const DEFAULT_HINT_TEXT: &str = "Type a comment or suggestion";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
}

/// Where the feedback ends up.
///
/// `site_root` points at the site that hosts the feedback list; `page_url`
/// is recorded alongside each comment so the receiver knows which page the
/// feedback is about.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct SubmitConfig {
    pub site_root: Option<String>,
    pub page_url: Option<String>,
    #[serde(default)]
    pub local_workbench: bool,
    #[serde(default)]
    pub use_mock_server: bool,
}

/// Whether a real backend is reachable from this run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvironmentType {
    /// Local workbench: no list endpoint to save to.
    Local,
    Connected,
}

impl SubmitConfig {
    pub fn environment(&self) -> EnvironmentType {
        if self.local_workbench {
            EnvironmentType::Local
        } else if self.use_mock_server || self.site_root.is_some() {
            EnvironmentType::Connected
        } else {
            EnvironmentType::Local
        }
    }

    /// The URL stored in submitted records. Falls back to the site root when
    /// no page URL is configured.
    pub fn record_url(&self) -> String {
        self.page_url
            .clone()
            .or_else(|| self.site_root.clone())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WidgetConfig {
    #[serde(default)]
    pub hint_text: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub submit: SubmitConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
}

impl Config {
    pub fn new(cli_source: Option<crate::cli::ClapSource>) -> Result<Self> {
        let data_dir = get_data_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_str().unwrap())?
            .set_default("widget.hint_text", DEFAULT_HINT_TEXT)?
            .set_default("submit.local_workbench", false)?
            .set_default("submit.use_mock_server", false)?;

        // Add CLI source last (highest priority)
        if let Some(cli_source) = cli_source {
            builder = builder.add_source(cli_source);
        }

        let cfg: Self = builder
            .build()
            .context("Error building config")?
            .try_deserialize()
            .context("Error deserialize config")?;

        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = env::var(format!("{}_DATA", PROJECT_NAME.clone()))
        .ok()
        .map(PathBuf::from)
    {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "feedbackflow", env!("CARGO_PKG_NAME"))
}
