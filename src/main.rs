use clap::Parser;
use firmsign::config::Config;
use firmsign::server;
use firmsign::store::{random_salt, ICredentialStore};
use std::error::Error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
enum FirmSignCli {
    Serve(ServeArgs),
    AddUser(AddUserArgs),
    Records(RecordsArgs),
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Run the firmware sign and sensor registration listeners")]
struct ServeArgs {
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Add an operator allowed to log into the sign channel")]
struct AddUserArgs {
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    user: String,

    #[arg(short, long)]
    password: String,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Print the stored firmware sign records as JSON")]
struct RecordsArgs {
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    let r = match FirmSignCli::parse() {
        FirmSignCli::Serve(args) => serve(&args).map_err(|e| format!("server failed: {e}")),

        FirmSignCli::AddUser(args) => match add_user(&args) {
            Ok(true) => {
                println!("user {} added", args.user);
                Ok(())
            }
            Ok(false) => Err(format!("user {} already exists", args.user)),
            Err(e) => Err(format!("adding user failed: {e}")),
        },

        FirmSignCli::Records(args) => records(&args).map_err(|e| format!("listing records failed: {e}")),
    };

    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Option<String>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(p) => Ok(Config::from_file(p)?),
        None => Ok(Config::default()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn serve(args: &ServeArgs) -> Result<(), Box<dyn Error>> {
    init_logging(args.verbose);

    let cfg = load_config(&args.config)?;

    server::run(&cfg)?;

    Ok(())
}

fn add_user(args: &AddUserArgs) -> Result<bool, Box<dyn Error>> {
    let cfg = load_config(&args.config)?;

    let store = server::open_store(&cfg)?;

    Ok(store.add_user(&args.user, &random_salt()?, &args.password)?)
}

fn records(args: &RecordsArgs) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(&args.config)?;

    let store = server::open_store(&cfg)?;

    let j = serde_json::to_string_pretty(&store.records()?)?;
    println!("{j}");

    Ok(())
}
