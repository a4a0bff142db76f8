//! CLI tool for modpak archive operations.

mod commands;
mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Deterministic .pak builder for mod packaging
#[derive(Parser)]
#[command(name = "modpak")]
#[command(author, version, about = "Deterministic .pak builder for mod packaging", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress summary output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a directory into a pak (alias: p)
    #[command(alias = "p")]
    Pack {
        /// Directory whose contents become the archive root
        dir: PathBuf,

        /// Archive file to create
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Reject paths that differ only in case
        #[arg(long)]
        case_insensitive: bool,
    },

    /// List archive contents (alias: l)
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,
    },

    /// Verify archive structure and checksums (alias: t)
    #[command(alias = "t")]
    Verify {
        /// Archive file to verify
        archive: PathBuf,
    },

    /// Extract files from archive (alias: x)
    #[command(alias = "x")]
    Extract {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Pack {
            dir,
            output,
            case_insensitive,
        } => commands::pack(&commands::PackConfig {
            source_dir: &dir,
            archive_path: &output,
            case_insensitive,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::List { archive } => commands::list(&archive, cli.format),

        Commands::Verify { archive } => commands::verify(&archive, cli.format, cli.quiet),

        Commands::Extract { archive, output } => {
            commands::extract(&archive, &output, cli.format, cli.quiet)
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
