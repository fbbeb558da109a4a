//! Lambda Deployer - Entry Point
//!
//! Command line front end for deploying, inspecting and removing apps that
//! run as AWS Lambda functions.

use std::collections::HashMap;
use std::env;

use deployer_spi::{AppDeployer, AppDeploymentRequest};
use lambda_deployer::app::state::AppState;
use lambda_deployer::errors::DeployerError;
use lambda_deployer::logs::{init_logging, LogOptions};
use lambda_deployer::settings::{Settings, DEFAULT_SETTINGS_PATH};
use lambda_deployer::utils::version_info;

use tracing::{error, info};

const USAGE: &str = "\
usage: lambda-deployer <command> [--settings=<path>]
  deploy   --request=<file.json>   create the function, print its id
  status   --id=<id>               print the app status as JSON
  undeploy --id=<id>               delete the function if it exists
  env                              print platform information as JSON
  --version                        print version information";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();
    let mut command: Option<String> = None;

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        } else if command.is_none() {
            command = Some(arg.clone());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to render version info: {e}"),
        }
        return;
    }

    let Some(command) = command else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    // Load settings
    let settings_path = cli_args
        .get("settings")
        .cloned()
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings = match Settings::load(&settings_path)
        .await
        .and_then(Settings::with_env_overrides)
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file {settings_path}: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_dir.clone(),
        json_format: settings.log_json,
        ..Default::default()
    };
    let guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let state = AppState::init(&settings).await;
    let code = match run_command(&command, &cli_args, &state).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{} failed: {}", command, e);
            1
        }
    };

    drop(guard);
    std::process::exit(code);
}

async fn run_command(
    command: &str,
    cli_args: &HashMap<String, String>,
    state: &AppState,
) -> Result<(), DeployerError> {
    let deployer = state.deployer.as_ref();

    match command {
        "deploy" => {
            let path = required_arg(cli_args, "request")?;
            let contents = tokio::fs::read_to_string(path).await?;
            let request: AppDeploymentRequest = serde_json::from_str(&contents)?;
            let id = deployer.deploy(&request).await?;
            println!("{}", id);
        }
        "status" => {
            let id = required_arg(cli_args, "id")?;
            let status = deployer.status(id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "undeploy" => {
            let id = required_arg(cli_args, "id")?;
            deployer.undeploy(id).await?;
            info!("Undeployed {}", id);
        }
        "env" => {
            let info = deployer.environment_info();
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        other => {
            eprintln!("{}", USAGE);
            return Err(DeployerError::ConfigError(format!("Unknown command: {}", other)));
        }
    }

    Ok(())
}

fn required_arg<'a>(
    cli_args: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, DeployerError> {
    cli_args
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| DeployerError::ConfigError(format!("--{}=<value> is required", key)))
}
