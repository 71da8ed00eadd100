use std::{fs, time::Duration};

use structopt::StructOpt;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use soapfold::{fetch::FetchConfig, WsdlService};

#[derive(Debug, Error)]
enum Error {
    #[error("Error reading WSDL")]
    ServiceError(#[from] soapfold::error::Error),

    #[error("Error writing JSON")]
    JsonError(#[from] serde_json::Error),

    #[error("Error")]
    IoError(#[from] std::io::Error),
}

#[derive(StructOpt)]
enum Command {
    /// List the operations of the first binding
    Methods { source: String },

    /// List the namespace prefixes declared on the definitions element
    Namespaces { source: String },

    /// Resolve the request and response parameters of a method
    Params { source: String, method: String },

    /// Fold an XML file (e.g. a SOAP response) into JSON
    Fold { file: String },
}

#[derive(StructOpt)]
struct Args {
    #[structopt(short, long)]
    verbose: bool,

    /// Request timeout in seconds
    #[structopt(short, long)]
    timeout: Option<u64>,

    #[structopt(subcommand)]
    command: Command,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "soapfold=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    init_logging(args.verbose);

    let config = FetchConfig {
        timeout: args.timeout.map(Duration::from_secs),
        ..Default::default()
    };

    let output = match args.command {
        Command::Methods { source } => {
            serde_json::to_string_pretty(&WsdlService::with_config(source, &config)?.all_methods()?)?
        }

        Command::Namespaces { source } => {
            serde_json::to_string_pretty(&WsdlService::with_config(source, &config)?.namespaces()?)?
        }

        Command::Params { source, method } => serde_json::to_string_pretty(
            &WsdlService::with_config(source, &config)?.method_params_by_name(&method)?,
        )?,

        Command::Fold { file } => {
            serde_json::to_string_pretty(&WsdlService::xml_data_as_json(&fs::read_to_string(file)?)?)?
        }
    };

    println!("{}", output);
    Ok(())
}
