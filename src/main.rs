use clap::Parser;
use firefox_installer::{
    logging, Cli, FirefoxInstaller, InstallerError, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    logging::init_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let installer = match FirefoxInstaller::from_cli(&cli) {
        Ok(installer) => installer,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cli, &installer);
    }

    match installer.install(&cli.preselection()).await {
        Ok(report) => {
            installer.output_formatter().print_install_report(&report);
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "installation failed");
            installer.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &InstallerError) -> i32 {
    match error {
        InstallerError::Cancelled => 130, // Interrupted (SIGINT) or end of input
        InstallerError::InvalidUrl { .. }
        | InstallerError::InvalidSelection { .. }
        | InstallerError::UnsafeValue { .. } => 2,
        InstallerError::DownloadLinkNotFound { .. } | InstallerError::NoOptions { .. } => 3,
        InstallerError::Network { .. } | InstallerError::HttpStatus { .. } => 4,
        InstallerError::UnsupportedArchive
        | InstallerError::ArchiveLayout { .. }
        | InstallerError::PathTraversal { .. } => 5,
        InstallerError::Permission { .. } => 6,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "firefox-installer.toml".to_string());

    match FirefoxInstaller::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  firefox-installer --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            exit_code_for(&e)
        }
    }
}

fn handle_dry_run(cli: &Cli, installer: &FirefoxInstaller) -> i32 {
    let formatter = installer.output_formatter();

    let plan = match installer.plan(&cli.preselection()) {
        Ok(plan) => plan,
        Err(e) => {
            installer.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    if formatter.mode() == OutputMode::Json {
        match serde_json::to_string_pretty(&plan) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                formatter.error(&format!("Failed to serialize plan: {}", e));
                return 1;
            }
        }
        return 0;
    }

    formatter.note("DRY RUN MODE - nothing will be downloaded or installed");
    formatter.print_separator();

    println!("  Download page: {}", plan.page_url);
    println!("  Data home: {}", plan.data_home.display());
    println!("  Install root: {}", plan.install_root.display());
    println!("  Product: {}", plan.product.as_deref().unwrap_or("(ask)"));
    println!("  Platform: {}", plan.platform.as_deref().unwrap_or("(ask)"));
    println!("  Language: {}", plan.language.as_deref().unwrap_or("(ask)"));
    println!(
        "  Desktop entry: {}",
        if plan.create_desktop_entry { "yes" } else { "no" }
    );

    if let Some(ref layout) = plan.layout {
        println!("  Install directory: {}", layout.install_dir.display());
        if layout.install_dir.exists() {
            formatter.warning("The existing installation in this directory would be replaced");
        }
        if plan.create_desktop_entry {
            println!("  Desktop file: {}", layout.desktop_file.display());
        }
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to install");

    0
}

fn print_startup_error(error: &InstallerError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
