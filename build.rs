// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn dir_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("packages_dir")
            .long("packages-dir")
            .value_name("PATH")
            .global(true)
            .default_value("/usr/local/share/tarstall")
            .help("Directory holding extracted packages and the manifest [env: TARSTALL_PACKAGES_DIR]"),
    )
    .arg(
        Arg::new("bin_dir")
            .long("bin-dir")
            .value_name("PATH")
            .global(true)
            .default_value("/usr/local/bin")
            .help("Directory receiving executable symlinks [env: TARSTALL_BIN_DIR]"),
    )
    .arg(
        Arg::new("applications_dir")
            .long("applications-dir")
            .value_name("PATH")
            .global(true)
            .default_value("/usr/share/applications")
            .help("Directory receiving .desktop entries [env: TARSTALL_APPLICATIONS_DIR]"),
    )
}

fn build_cli() -> Command {
    let cmd = Command::new("tarstall")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Tarstall Contributors")
        .about("Install and remove self-contained tarball applications")
        .subcommand_required(false);

    dir_args(cmd)
        .subcommand(
            Command::new("install")
                .about("Install a package from a .tar.gz archive")
                .arg(Arg::new("archive").required(true).help("Path to the archive"))
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("Friendly package name (prompted for if omitted)"),
                )
                .arg(
                    Arg::new("executable")
                        .short('e')
                        .long("executable")
                        .help("Executable to link, relative to the package root"),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Replace an existing symlink without asking"),
                ),
        )
        .subcommand(
            Command::new("uninstall")
                .about("Uninstall a package by name")
                .arg(Arg::new("package_name").required(true).help("Package name to remove")),
        )
        .subcommand(Command::new("list").about("List installed packages"))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("tarstall.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
