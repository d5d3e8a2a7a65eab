mod commands;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use prerender_kit_lists::Hook;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prerender-kit")]
#[command(version, about = "Build-time content lists and route lists for static sites", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Scaffold prerender.toml and example content
    Init {
        /// Path to project directory
        path: PathBuf,
    },

    /// Build every configured list and save it as JSON
    Lists {
        /// Path to project directory
        path: PathBuf,

        /// Host build hook this run is serving
        #[arg(long, value_enum, default_value = "before-build")]
        hook: HookArg,
    },

    /// Print the routes to pre-render from the saved lists
    Routes {
        /// Path to project directory
        path: PathBuf,

        /// Print a JSON array instead of one route per line
        #[arg(long)]
        json: bool,

        /// Also write the routes as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the lists, then derive routes from them
    Generate {
        /// Path to project directory
        path: PathBuf,

        /// Write the routes as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HookArg {
    BeforeBuild,
    BeforeGenerate,
}

impl From<HookArg> for Hook {
    fn from(arg: HookArg) -> Self {
        match arg {
            HookArg::BeforeBuild => Hook::BeforeBuild,
            HookArg::BeforeGenerate => Hook::BeforeGenerate,
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "prerender_kit={level},prerender_kit_lists={level},prerender_kit_routes={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Lists { path, hook } => commands::lists::run(path, hook.into()).await,
        Command::Routes { path, json, output } => {
            commands::routes::run(path, json, output).await
        }
        Command::Generate { path, output } => commands::generate::run(path, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "prerender-kit", &mut io::stdout());
            Ok(())
        }
    }
}
