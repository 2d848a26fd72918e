// src/main.rs

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io::{self, Write};
use std::path::PathBuf;
use tarstall::config::{DEFAULT_APPLICATIONS_DIR, DEFAULT_BIN_DIR, DEFAULT_PACKAGES_DIR};
use tarstall::installer::{self, InstallOptions};
use tarstall::manifest::PackageRecord;
use tarstall::prompt::Prompter;
use tarstall::Config;
use tracing::info;

#[derive(Parser)]
#[command(name = "tarstall")]
#[command(author, version, about = "Install and remove self-contained tarball applications", long_about = None)]
struct Cli {
    #[command(flatten)]
    dirs: DirArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Filesystem locations, shared by every subcommand
#[derive(Args)]
struct DirArgs {
    /// Directory holding extracted packages and the manifest
    #[arg(long, global = true, env = "TARSTALL_PACKAGES_DIR", default_value = DEFAULT_PACKAGES_DIR)]
    packages_dir: PathBuf,

    /// Directory receiving executable symlinks
    #[arg(long, global = true, env = "TARSTALL_BIN_DIR", default_value = DEFAULT_BIN_DIR)]
    bin_dir: PathBuf,

    /// Directory receiving .desktop entries
    #[arg(long, global = true, env = "TARSTALL_APPLICATIONS_DIR", default_value = DEFAULT_APPLICATIONS_DIR)]
    applications_dir: PathBuf,
}

impl From<DirArgs> for Config {
    fn from(dirs: DirArgs) -> Self {
        Config::new(dirs.packages_dir, dirs.bin_dir, dirs.applications_dir)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Install a package from a .tar.gz archive
    Install {
        /// Path to the archive
        archive: PathBuf,
        /// Friendly package name (prompted for if omitted)
        #[arg(short, long)]
        name: Option<String>,
        /// Executable to link, relative to the package root (prompted for if omitted)
        #[arg(short, long)]
        executable: Option<PathBuf>,
        /// Replace an existing symlink without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Uninstall a package by name
    Uninstall {
        /// Package name to remove
        package_name: String,
    },
    /// List installed packages
    List,
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}

fn print_packages(records: &[PackageRecord]) {
    if records.is_empty() {
        println!("No packages installed.");
        return;
    }

    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|record| {
            [
                record.display_name.clone(),
                record.install_root.display().to_string(),
                record.executable.display().to_string(),
            ]
        })
        .collect();

    let headers = ["NAME", "INSTALL PATH", "EXECUTABLE"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    println!("{:<w0$}  {:<w1$}  {}", headers[0], headers[1], headers[2], w0 = widths[0], w1 = widths[1]);
    println!(
        "{:<w0$}  {:<w1$}  {}",
        "----",
        "------------",
        "-----------",
        w0 = widths[0],
        w1 = widths[1]
    );
    for row in &rows {
        println!("{:<w0$}  {:<w1$}  {}", row[0], row[1], row[2], w0 = widths[0], w1 = widths[1]);
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from(cli.dirs).absolute()?;

    match cli.command {
        Some(Commands::Install {
            archive,
            name,
            executable,
            yes,
        }) => {
            info!("Installing package from: {}", archive.display());

            let options = InstallOptions {
                name,
                executable,
                assume_yes: yes,
            };
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            let outcome = installer::install(&config, &archive, &options, &mut prompter)?;

            println!("Package '{}' installed successfully.", outcome.record.display_name);
            println!("  Install path: {}", outcome.record.install_root.display());
            println!("  Symlink: {} -> {}", outcome.link.display(), outcome.record.executable.display());
            println!("  Desktop entry: {}", outcome.desktop_file.display());
            if !outcome.report.skipped.is_empty() {
                println!("  Skipped entries: {}", outcome.report.skipped.len());
            }
            Ok(())
        }
        Some(Commands::Uninstall { package_name }) => {
            info!("Uninstalling package: {}", package_name);

            let outcome = installer::uninstall(&config, &package_name)?;

            println!("Package '{}' uninstalled successfully.", outcome.record.display_name);
            if !outcome.cleanup_failures.is_empty() {
                println!("  {} cleanup step(s) failed, see log above", outcome.cleanup_failures.len());
            }
            Ok(())
        }
        Some(Commands::List) => {
            let records = installer::list(&config)?;
            print_packages(&records);
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
            io::stdout().flush()?;
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("tarstall v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'tarstall --help' for usage information");
            Ok(())
        }
    }
}
