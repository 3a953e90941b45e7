use clap::Parser;
use color_eyre::Result;
use config::Source;

use crate::config::get_data_dir;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 60.0)]
    pub frame_rate: f64,

    /// Path to the data directory
    #[arg(short, long, value_name = "PATH")]
    pub data_dir: Option<String>,

    /// Root URL of the site that hosts the feedback list
    #[arg(short, long, value_name = "URL")]
    pub site_root: Option<String>,

    /// URL recorded alongside each comment (defaults to the site root)
    #[arg(short, long, value_name = "URL")]
    pub page_url: Option<String>,

    /// Placeholder text shown in the empty comment field
    #[arg(long, value_name = "TEXT")]
    pub hint_text: Option<String>,

    /// Run against the local workbench (feedback cannot be saved)
    #[arg(long)]
    pub local_workbench: bool,

    /// Submit to an in-process mock server instead of a real site
    #[arg(long)]
    pub use_mock_server: bool,
}

const VERSION_MESSAGE: &str = concat!(env!("CARGO_PKG_VERSION"));

pub fn version() -> String {
    let author = clap::crate_authors!();

    let data_dir_path = get_data_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Data directory: {data_dir_path}"
    )
}

#[derive(Debug)]
pub(crate) struct ClapSource {
    pub data_dir: Option<String>,
    pub site_root: Option<String>,
    pub page_url: Option<String>,
    pub hint_text: Option<String>,
    pub local_workbench: bool,
    pub use_mock_server: bool,
}

impl ClapSource {
    pub fn new(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            site_root: cli.site_root.clone(),
            page_url: cli.page_url.clone(),
            hint_text: cli.hint_text.clone(),
            local_workbench: cli.local_workbench,
            use_mock_server: cli.use_mock_server,
        }
    }
}

impl Source for ClapSource {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(Self {
            data_dir: self.data_dir.clone(),
            site_root: self.site_root.clone(),
            page_url: self.page_url.clone(),
            hint_text: self.hint_text.clone(),
            local_workbench: self.local_workbench,
            use_mock_server: self.use_mock_server,
        })
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut map = config::Map::new();
        if self.data_dir.is_some() {
            map.insert(
                "data_dir".to_string(),
                config::Value::new(None, self.data_dir.clone()),
            );
        }
        if self.site_root.is_some() {
            map.insert(
                "submit.site_root".to_string(),
                config::Value::new(None, self.site_root.clone()),
            );
        }
        if self.page_url.is_some() {
            map.insert(
                "submit.page_url".to_string(),
                config::Value::new(None, self.page_url.clone()),
            );
        }
        if let Some(hint_text) = &self.hint_text {
            map.insert(
                "widget.hint_text".to_string(),
                config::Value::new(None, hint_text.clone()),
            );
        }
        // flags only override the config file when actually passed
        if self.local_workbench {
            map.insert(
                "submit.local_workbench".to_string(),
                config::Value::new(None, true),
            );
        }
        if self.use_mock_server {
            map.insert(
                "submit.use_mock_server".to_string(),
                config::Value::new(None, true),
            );
        }
        Ok(map)
    }
}
