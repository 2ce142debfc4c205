use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use valuer::core::country::CountryCode;
use valuer::core::features::PropertyInput;
use valuer::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Refresh and show exchange rates
    Rates {
        /// Fetch even when the cached rates are fresh
        #[arg(long)]
        force: bool,
    },
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        /// Country whose currency the amount is in (default: USD)
        #[arg(long)]
        from: Option<CountryCode>,
        /// Target country (default: selected country)
        #[arg(long)]
        to: Option<CountryCode>,
    },
    /// Show or set the selected country
    Country { country: Option<CountryCode> },
    /// Save the API key for the remote model
    Login { token: String },
    /// Forget the saved API key
    Logout,
    /// Estimate the price of a property
    Predict(PredictArgs),
    /// Value the sample listings from the configuration
    Listings {
        /// Only show listings in this country
        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(Args)]
struct PredictArgs {
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    property_type: Option<String>,
    #[arg(long)]
    bedrooms: Option<String>,
    #[arg(long)]
    bathrooms: Option<String>,
    /// Living area in square feet
    #[arg(long)]
    sqft: Option<String>,
    #[arg(long)]
    lot_size: Option<String>,
    #[arg(long)]
    year_built: Option<String>,
    /// excellent, good, fair or poor
    #[arg(long)]
    condition: Option<String>,
    #[arg(long)]
    features: Option<String>,
    #[arg(long)]
    country: Option<CountryCode>,
}

impl From<PredictArgs> for PropertyInput {
    fn from(args: PredictArgs) -> Self {
        PropertyInput {
            address: args.address,
            property_type: args.property_type,
            bedrooms: args.bedrooms,
            bathrooms: args.bathrooms,
            square_footage: args.sqft,
            lot_size: args.lot_size,
            year_built: args.year_built,
            condition: args.condition,
            features: args.features,
            country: args.country,
        }
    }
}

impl From<Commands> for valuer::AppCommand {
    fn from(cmd: Commands) -> valuer::AppCommand {
        match cmd {
            Commands::Rates { force } => valuer::AppCommand::Rates { force },
            Commands::Convert { amount, from, to } => {
                valuer::AppCommand::Convert { amount, from, to }
            }
            Commands::Country { country } => valuer::AppCommand::Country { set: country },
            Commands::Login { token } => valuer::AppCommand::Login { token },
            Commands::Logout => valuer::AppCommand::Logout,
            Commands::Predict(args) => valuer::AppCommand::Predict(args.into()),
            Commands::Listings { country } => valuer::AppCommand::Listings { country },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => valuer::cli::setup::setup_at_path(path),
            None => valuer::cli::setup::setup(),
        },
        Some(cmd) => valuer::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
