use clap::{Parser, Subcommand};
use ngcpy::{
    commands::{
        call,
        canon,
        config::{self, ConfigAction},
        procedures,
    },
    errors::CliError,
    logger, GlobalOpts,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ngcpy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Python oword procedures for RS274/NGC",
    long_about = "ngcpy loads a Python oword script the way the interpreter does and calls its procedures against a standalone interpreter."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a procedure with up to 30 numeric arguments
    Call {
        /// Procedure name
        name: String,
        /// Positional values; missing slots are zero
        #[arg(allow_negative_numbers = true)]
        args: Vec<f64>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Exit non-zero unless NAME is a callable of the script
    Check { name: String },
    /// List the script's callables
    List,
    /// Show the canon primitives available as CanonMod
    Canon {
        /// Only names containing this text
        filter: Option<String>,
        /// Show the primitives that are not bound instead
        #[arg(long)]
        omitted: bool,
    },
    /// Configure ngcpy
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "ngc_python=warn",
        1 => "ngc_python=debug",
        _ => "ngc_python=trace,ngcpy=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Call { name, args, json } => {
            call::handle_call(&name, &args, json, &cli.global)?;
        }
        Commands::Check { name } => {
            if !procedures::handle_check(&name, &cli.global)? {
                std::process::exit(1);
            }
        }
        Commands::List => procedures::handle_list(&cli.global)?,
        Commands::Canon { filter, omitted } => canon::handle_canon(filter.as_deref(), omitted),
        Commands::Config { action } => {
            config::handle_config(action.unwrap_or(ConfigAction::Show), &cli.global)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), false) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    let verbosity = cli.global.verbosity_level();
    init_tracing(verbosity);

    if let Err(e) = run(cli) {
        // bridge failures were already printed through the interpreter's error channel
        let reported = e
            .downcast_ref::<CliError>()
            .is_some_and(CliError::reported);
        if !reported {
            logger::error(&format!("{:#}", e));
        }
        if verbosity >= 1 {
            logger::show_log_path();
        }
        std::process::exit(1);
    }
}
