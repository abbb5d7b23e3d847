pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod logging;
pub mod page;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat, Preselection};
pub use config::{CliOverrides, Config, DesktopConfig, InstallConfig, SourceConfig};
pub use error::{InstallerError, Result, UserFriendlyError};

// Core functionality re-exports
pub use installer::{
    stage_archive, ArchiveDownloader, Compression, DesktopEntry, DownloadProgress, InstallLayout,
    InstallReport, InstallSummary, StagedInstall,
};
pub use page::{DownloadPage, ReleaseChannel, Selection};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager, Prompt};

use installer::layout::resolve_data_home;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tokio::task;
use url::Url;

/// Main library interface: downloads, unpacks and registers one Firefox build.
pub struct FirefoxInstaller {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl FirefoxInstaller {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Instance without a Ctrl+C handler, so several can coexist in one process.
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Runs the whole installation, prompting on the terminal for anything
    /// not preselected.
    pub async fn install(&self, preselection: &Preselection) -> Result<InstallReport> {
        let mut prompt = ui::terminal_prompt(self.output_formatter.mode() == OutputMode::Json);
        self.install_with_prompt(preselection, &mut prompt).await
    }

    pub async fn install_with_prompt<R: BufRead, W: Write>(
        &self,
        preselection: &Preselection,
        prompt: &mut Prompt<R, W>,
    ) -> Result<InstallReport> {
        let start_time = Instant::now();
        self.shutdown.check_shutdown()?;

        let data_home = resolve_data_home(self.config.install.data_home.as_deref())?;
        let client = page::build_client(&self.config)?;

        // Step 1 and 2: the parsed page is only needed until the link is known
        let (selection, download_url) = {
            let download_page = self.fetch_page(&client).await?;
            self.shutdown.check_shutdown()?;

            let selection = self.progress_manager.suspend(|| {
                self.shutdown
                    .while_prompting(|| self.choose_release(&download_page, preselection, prompt))
            })?;
            let download_url = download_page.download_url(
                &selection.product,
                &selection.language,
                &selection.platform,
            )?;
            (selection, download_url)
        };
        self.shutdown.check_shutdown()?;

        self.output_formatter.debug(&selection.display_summary());
        tracing::info!(
            product = %selection.product,
            platform = %selection.platform,
            language = %selection.language,
            url = %download_url,
            "release selected"
        );

        let layout = InstallLayout::new(&data_home, &self.config.install.prefix, &selection)?;
        layout.create_install_root()?;

        // Step 3
        let (archive, download) = self.download_archive(&client, &download_url).await?;
        self.shutdown.check_shutdown()?;

        // Step 4
        let (compression, replaced_existing) = self.extract_archive(archive, &layout).await?;
        self.shutdown.check_shutdown()?;

        // Step 5
        let desktop_file = if self.config.desktop.create_entry {
            Some(self.create_desktop_entry(&selection, &layout)?)
        } else {
            self.output_formatter
                .info("Skipping desktop file creation");
            None
        };

        let install_dir = layout.install_dir.clone();
        let (files_installed, bytes_installed) =
            task::spawn_blocking(move || installer::report::measure_tree(&install_dir))
                .await
                .map_err(|e| InstallerError::Config {
                    message: format!("Install scan task failed: {}", e),
                })?;

        let summary = InstallSummary {
            compression: Some(compression),
            archive_bytes: download.downloaded_bytes,
            files_installed,
            bytes_installed,
            duration: start_time.elapsed(),
        };

        Ok(InstallReport::new(
            selection,
            download_url.to_string(),
            &layout,
            desktop_file,
            replaced_existing,
            summary,
        ))
    }

    async fn fetch_page(&self, client: &reqwest::Client) -> Result<DownloadPage> {
        self.output_formatter
            .start_operation("Downloading and parsing the download page...");

        let spinner = self
            .progress_manager
            .create_spinner(&self.config.source.page_url);
        let started = Instant::now();

        let download_page = match page::fetch_download_page(client, &self.config.source.page_url).await {
            Ok(download_page) => download_page,
            Err(e) => {
                spinner.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(&spinner, "Page fetched", started.elapsed());
        self.output_formatter
            .success("Download page was downloaded and parsed.");

        Ok(download_page)
    }

    fn choose_release<R: BufRead, W: Write>(
        &self,
        download_page: &DownloadPage,
        preselection: &Preselection,
        prompt: &mut Prompt<R, W>,
    ) -> Result<Selection> {
        let catalog = download_page.catalog();

        let product = prompt.select(
            "product",
            "Pick a product:",
            &catalog.product_options(),
            preselection.product.as_deref(),
        )?;
        self.shutdown.check_shutdown()?;

        let platform = prompt.select(
            "platform",
            "Pick a platform:",
            &catalog.platform_options(&product),
            preselection.platform.as_deref(),
        )?;
        self.shutdown.check_shutdown()?;

        let language = prompt.select(
            "language",
            "Pick a language:",
            &catalog.language_options(&product),
            preselection.language.as_deref(),
        )?;

        Ok(Selection::new(product, platform, language))
    }

    async fn download_archive(
        &self,
        client: &reqwest::Client,
        url: &Url,
    ) -> Result<(NamedTempFile, DownloadProgress)> {
        self.output_formatter.start_operation("Downloading...");

        let progress_bar = self.progress_manager.create_download_progress();
        let progress_callback = {
            let pb = progress_bar.clone();
            move |progress: &DownloadProgress| {
                ui::progress::update_download_progress(&pb, progress);
            }
        };

        let downloader = ArchiveDownloader::new(client.clone())
            .with_running_flag(self.shutdown.running_flag())
            .with_progress(progress_callback);

        let (archive, download) = match downloader.download_to_temp(url).await {
            Ok(result) => result,
            Err(e) => {
                progress_bar.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &progress_bar,
            &ui::output::format_bytes(download.downloaded_bytes),
            download.elapsed(),
        );
        self.output_formatter.success("Download complete.");

        Ok((archive, download))
    }

    /// Unpacks next to the install root, then swaps the result into place.
    async fn extract_archive(
        &self,
        archive: NamedTempFile,
        layout: &InstallLayout,
    ) -> Result<(Compression, bool)> {
        self.output_formatter.start_operation("Extracting...");

        let spinner = self.progress_manager.create_spinner("Unpacking archive");
        let started = Instant::now();

        let staging_parent = layout.install_root.clone();
        let staged = task::spawn_blocking(move || {
            let staged = stage_archive(archive.path(), &staging_parent);
            drop(archive);
            staged
        })
        .await
        .map_err(|e| InstallerError::Config {
            message: format!("Extraction task failed: {}", e),
        })?;

        let staged = match self.shutdown.with_shutdown_check(|| staged) {
            Ok(staged) => staged,
            Err(e) => {
                spinner.abandon();
                return Err(e);
            }
        };
        let compression = staged.compression();
        ui::progress::finish_progress_with_summary(
            &spinner,
            &format!("{} entries", staged.entries()),
            started.elapsed(),
        );

        if layout.install_dir.exists() {
            self.output_formatter
                .start_operation("Removing old Firefox installation...");
            self.output_formatter
                .note("You will not lose your profiles or data.");
        }

        let install_dir = layout.install_dir.clone();
        let replaced_existing = task::spawn_blocking(move || staged.commit(&install_dir))
            .await
            .map_err(|e| InstallerError::Config {
                message: format!("Extraction task failed: {}", e),
            })??;

        if replaced_existing {
            self.output_formatter.info("Old Firefox installation removed.");
        }
        self.output_formatter.success("Extract complete.");

        Ok((compression, replaced_existing))
    }

    fn create_desktop_entry(&self, selection: &Selection, layout: &InstallLayout) -> Result<PathBuf> {
        self.output_formatter.start_operation("Creating desktop file...");

        let entry = DesktopEntry::render(&selection.channel(), &layout.install_dir);
        let path = entry.write(layout)?;

        self.output_formatter.success("Desktop file created.");
        self.output_formatter
            .debug(&format!("Desktop file: {}", path.display()));

        Ok(path)
    }

    /// Resolves everything that can be known without network access.
    pub fn plan(&self, preselection: &Preselection) -> Result<InstallPlan> {
        let data_home = resolve_data_home(self.config.install.data_home.as_deref())?;
        let install_root = data_home.join(&self.config.install.prefix);

        let layout = match (
            &preselection.product,
            &preselection.platform,
            &preselection.language,
        ) {
            (Some(product), Some(platform), Some(language)) => {
                let selection = Selection::new(product.as_str(), platform.as_str(), language.as_str());
                Some(InstallLayout::new(
                    &data_home,
                    &self.config.install.prefix,
                    &selection,
                )?)
            }
            _ => None,
        };

        Ok(InstallPlan {
            page_url: self.config.source.page_url.clone(),
            data_home,
            install_root,
            product: preselection.product.clone(),
            platform: preselection.platform.clone(),
            language: preselection.language.clone(),
            create_desktop_entry: self.config.desktop.create_entry,
            layout,
        })
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)
            .map_err(|e| error::io_error_at(e, output_path.as_ref()))?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &InstallerError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// What a run would do, as far as it is known before the page is fetched.
#[derive(Debug, Clone, Serialize)]
pub struct InstallPlan {
    pub page_url: String,
    pub data_home: PathBuf,
    pub install_root: PathBuf,
    pub product: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub create_desktop_entry: bool,
    /// Only known when product, platform and language are all preselected.
    pub layout: Option<InstallLayout>,
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(data_home: &Path) -> Config {
        let mut config = Config::default();
        config.install.data_home = Some(data_home.to_path_buf());
        config
    }

    #[test]
    fn test_installer_creation() {
        let installer = FirefoxInstaller::new_for_test(Config::default(), OutputMode::Human, 1, false);
        assert!(installer.is_running());
        assert_eq!(installer.config().install.prefix, "firefox_installer");
    }

    #[test]
    fn test_plan_without_preselection() {
        let temp_dir = TempDir::new().unwrap();
        let installer =
            FirefoxInstaller::new_for_test(test_config(temp_dir.path()), OutputMode::Plain, 0, true);

        let plan = installer.plan(&Preselection::default()).unwrap();
        assert_eq!(plan.data_home, temp_dir.path());
        assert_eq!(plan.install_root, temp_dir.path().join("firefox_installer"));
        assert_eq!(plan.page_url, config::DEFAULT_PAGE_URL);
        assert!(plan.create_desktop_entry);
        assert!(plan.layout.is_none());
        assert!(!plan.install_root.exists());
    }

    #[test]
    fn test_plan_with_full_preselection() {
        let temp_dir = TempDir::new().unwrap();
        let installer =
            FirefoxInstaller::new_for_test(test_config(temp_dir.path()), OutputMode::Plain, 0, true);

        let preselection = Preselection {
            product: Some("desktop_beta".to_string()),
            platform: Some("linux64".to_string()),
            language: Some("de".to_string()),
        };
        let plan = installer.plan(&preselection).unwrap();
        let layout = plan.layout.unwrap();

        assert_eq!(
            layout.install_dir,
            temp_dir.path().join("firefox_installer/firefox_beta-linux64-de")
        );
        assert_eq!(
            layout.desktop_file,
            temp_dir
                .path()
                .join("applications/firefox_installer-firefox_desktop_beta_linux64_de.desktop")
        );
    }

    #[test]
    fn test_plan_rejects_unsafe_preselection() {
        let temp_dir = TempDir::new().unwrap();
        let installer =
            FirefoxInstaller::new_for_test(test_config(temp_dir.path()), OutputMode::Plain, 0, true);

        let preselection = Preselection {
            product: Some("desktop_release".to_string()),
            platform: Some("linux64".to_string()),
            language: Some("../../etc".to_string()),
        };
        assert!(matches!(
            installer.plan(&preselection),
            Err(InstallerError::UnsafeValue { .. })
        ));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        FirefoxInstaller::generate_sample_config(&config_path).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[source]"));
        assert!(content.contains("[install]"));
        assert!(content.contains("[desktop]"));
    }

    #[tokio::test]
    async fn test_install_stops_after_shutdown_request() {
        let temp_dir = TempDir::new().unwrap();
        let installer =
            FirefoxInstaller::new_for_test(test_config(temp_dir.path()), OutputMode::Plain, 0, true);
        installer.request_shutdown();

        let mut prompt = Prompt::new(std::io::Cursor::new(&b""[..]), Vec::new());
        let result = installer
            .install_with_prompt(&Preselection::default(), &mut prompt)
            .await;

        assert!(matches!(result, Err(InstallerError::Cancelled)));
        assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
