//! Command line configuration of the tutorial
use std::path::PathBuf;

use clap::Parser;

/// Settings of the `gpxrun` tutorial
#[derive(Debug, Clone, Parser)]
#[command(name = "gpxrun", about = "Tutorial and exerciser for the gpx functions")]
pub struct TutorialConfig {
    /// CPLEX interactive optimizer executable
    #[arg(long, default_value = "cplex")]
    pub cplex: String,

    /// Directory prepended to file names when the custom environment is on
    #[arg(long, default_value = "./")]
    pub custom_dir: PathBuf,

    /// Extension appended to file names when the custom environment is on
    #[arg(long, default_value = ".txt")]
    pub extension: String,

    /// Start with the custom environment enabled
    #[arg(long)]
    pub custom_env: bool,

    /// Start with the function exerciser menu enabled
    #[arg(long)]
    pub exerciser: bool,

    /// Number of listed items between pauses, 0 to never pause
    #[arg(long, default_value_t = 50)]
    pub pause_after: usize,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        TutorialConfig {
            cplex: "cplex".into(),
            custom_dir: PathBuf::from("./"),
            extension: ".txt".into(),
            custom_env: false,
            exerciser: false,
            pause_after: 50,
            log_level: "warn".into(),
        }
    }
}

impl TutorialConfig {
    /// Full path of a file entered by its base name in the custom environment
    pub fn custom_path(&self, base_name: &str) -> PathBuf {
        self.custom_dir
            .join(format!("{}{}", base_name, self.extension))
    }

    /// Install the logger. Does nothing if one is already installed.
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .try_init();
    }
}
