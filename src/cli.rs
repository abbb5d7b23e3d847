use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "firefox-installer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install official Firefox builds into your home directory")]
#[command(
    long_about = "Firefox Installer scrapes the Mozilla download page, lets you pick a product, \
                  platform and language, then downloads and extracts the build and registers \
                  a launcher in your desktop menu."
)]
#[command(after_help = "EXAMPLES:\n  \
    firefox-installer\n  \
    firefox-installer --product desktop_beta --platform linux64 --language en-US\n  \
    firefox-installer --data-home ~/apps --no-desktop-entry\n  \
    firefox-installer --config my-config.toml --dry-run")]
pub struct Cli {
    /// Product to install (e.g. desktop_release), skips the product prompt
    #[arg(long)]
    pub product: Option<String>,

    /// Platform to install (e.g. linux64), skips the platform prompt
    #[arg(long)]
    pub platform: Option<String>,

    /// Language to install (e.g. en-US), skips the language prompt
    #[arg(long)]
    pub language: Option<String>,

    /// Download page to scrape
    #[arg(long, value_parser = validate_page_url)]
    pub page_url: Option<String>,

    /// Data directory used instead of $XDG_DATA_HOME
    #[arg(long, env = "FIREFOX_INSTALLER_DATA_HOME")]
    pub data_home: Option<PathBuf>,

    /// Do not create a desktop menu entry
    #[arg(long)]
    pub no_desktop_entry: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show the install plan without downloading anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_page_url(self.page_url.clone())
            .with_data_home(self.data_home.clone())
            .with_no_desktop_entry(self.no_desktop_entry)
    }

    pub fn preselection(&self) -> Preselection {
        Preselection {
            product: self.product.clone(),
            platform: self.platform.clone(),
            language: self.language.clone(),
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Values given on the command line in place of the interactive prompts.
#[derive(Debug, Clone, Default)]
pub struct Preselection {
    pub product: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
}

pub fn validate_page_url(s: &str) -> std::result::Result<String, String> {
    let url =
        Url::parse(s).map_err(|_| "Invalid URL format. Please provide a valid URL.".to_string())?;

    match url.scheme() {
        "https" | "http" => {}
        _ => return Err("Only HTTP and HTTPS download pages are supported".to_string()),
    }

    if url.host_str().is_none() {
        return Err("URL must include a valid hostname".to_string());
    }

    Ok(s.to_string())
}
