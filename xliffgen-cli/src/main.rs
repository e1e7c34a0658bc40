use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xliffgen::derive_unit_id;
use xliffgen_cli::{
    GenerateOptions,
    config::{run_config_init_command, run_config_show_command},
    generate::run_generate_command,
    sync::run_sync_command,
    view::run_list_command,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the unit id derived for a piece of text.
    Id {
        /// The selected text
        #[arg(short, long)]
        text: String,
        /// Path of the file the text was selected in
        #[arg(short, long)]
        file: Option<String>,
        /// Prefix used instead of the file name
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Insert or update a translation unit in an XLIFF file.
    Sync {
        /// The XLIFF (.xlf) file to update
        #[arg(short, long)]
        xliff: String,
        /// The unit id
        #[arg(short, long)]
        id: String,
        /// The target text
        #[arg(short, long)]
        text: String,
    },

    /// Replace a selection in a source file with a translation call.
    Generate {
        /// The source file (.twig, .php, .js, ...)
        #[arg(short, long)]
        file: String,
        /// Byte offset where the selection starts
        #[arg(long)]
        start: usize,
        /// Byte offset just past the end of the selection
        #[arg(long)]
        end: usize,
        /// Project root the translation path is relative to
        #[arg(long)]
        project_root: Option<String>,
        /// Settings file to use instead of <project root>/xliffgen.toml
        #[arg(short, long)]
        config: Option<String>,
        /// Print the translation call without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List the translation units of an XLIFF file.
    List {
        /// The XLIFF (.xlf) file to read
        #[arg(short, long)]
        xliff: String,
        /// Print units as JSON
        #[arg(long)]
        json: bool,
        /// Display full values without truncation
        #[arg(long)]
        full: bool,
    },

    /// Inspect or create the settings file.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective settings.
    Show {
        #[arg(long)]
        project_root: Option<String>,
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Write a settings file with the default values.
    Init {
        #[arg(long)]
        project_root: Option<String>,
        #[arg(short, long)]
        config: Option<String>,
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn root_or_cwd(project_root: Option<String>) -> PathBuf {
    project_root
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Id { text, file, prefix } => {
            println!("{}", derive_unit_id(&text, file.as_deref(), &prefix));
            Ok(())
        }
        Commands::Sync { xliff, id, text } => run_sync_command(xliff, id, text),
        Commands::Generate {
            file,
            start,
            end,
            project_root,
            config,
            dry_run,
        } => run_generate_command(GenerateOptions {
            file,
            start,
            end,
            project_root,
            config,
            dry_run,
        }),
        Commands::List { xliff, json, full } => run_list_command(xliff, json, full),
        Commands::Config { command } => match command {
            ConfigCommands::Show {
                project_root,
                config,
            } => run_config_show_command(&root_or_cwd(project_root), &config),
            ConfigCommands::Init {
                project_root,
                config,
                force,
            } => run_config_init_command(&root_or_cwd(project_root), &config, force),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
