//! cfndeploy - Entry Point
//!
//! Deploys a CloudFormation template to a stack through a change set.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use colored::Colorize;
use tracing::{error, info};

use cfndeploy::app::options::DeployOptions;
use cfndeploy::app::run::run;
use cfndeploy::filesys::file::File;
use cfndeploy::logs::{init_logging, LogLevel, LogOptions};
use cfndeploy::models::deployment::{DeployOutcome, DeployReport, DeploymentRequest};
use cfndeploy::naming::stack_name_from_label;
use cfndeploy::storage::settings::Settings;
use cfndeploy::utils::version_info;

const USAGE: &str = "\
Usage: cfndeploy --template=<path> (--stack=<name> | --label=<label>) [options]

Options:
  --named-iam           Acknowledge named IAM resources in the template
  --config=<path>       JSON settings file
  --region=<region>     AWS region
  --profile=<profile>   AWS profile
  --log-level=<level>   trace, debug, info, warn or error
  --json                Print the deployment report as JSON
  --version             Print version information";

#[tokio::main]
async fn main() {
    let cli_args = parse_args(env::args().skip(1));

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
        }
        return;
    }

    if cli_args.contains_key("help") {
        println!("{}", USAGE);
        return;
    }

    let settings = match load_settings(&cli_args).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_dir.as_ref().map(PathBuf::from),
        json_format: settings.log_json,
        ..Default::default()
    };
    let guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    let exit_code = match deploy_from_cli(&cli_args, &settings).await {
        Ok(report) => {
            print_report(&report, cli_args.contains_key("json"));
            0
        }
        Err(e) => {
            error!("Deployment failed: {:#}", e);
            eprintln!("{} {:#}", "deployment failed:".red().bold(), e);
            1
        }
    };

    drop(guard);
    std::process::exit(exit_code);
}

/// Parse `--key=value` and `--flag` arguments
fn parse_args(args: impl Iterator<Item = String>) -> HashMap<String, String> {
    let mut cli_args = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    cli_args
}

async fn load_settings(cli_args: &HashMap<String, String>) -> anyhow::Result<Settings> {
    let mut settings = match cli_args.get("config") {
        Some(path) => File::new(path)
            .read_json::<Settings>()
            .await
            .with_context(|| format!("unable to read settings file {}", path))?,
        None => Settings::default(),
    };

    if let Some(level) = cli_args.get("log-level") {
        settings.log_level = level.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(region) = cli_args.get("region") {
        settings.aws.region = Some(region.clone());
    }
    if let Some(profile) = cli_args.get("profile") {
        settings.aws.profile = Some(profile.clone());
    }

    settings.validate()?;
    Ok(settings)
}

async fn deploy_from_cli(
    cli_args: &HashMap<String, String>,
    settings: &Settings,
) -> anyhow::Result<DeployReport> {
    let stack_name = match (cli_args.get("stack"), cli_args.get("label")) {
        (Some(stack), _) => stack.clone(),
        (None, Some(label)) => stack_name_from_label(label),
        (None, None) => return Err(anyhow!("either --stack or --label is required\n\n{}", USAGE)),
    };

    let template_path = cli_args
        .get("template")
        .ok_or_else(|| anyhow!("--template is required\n\n{}", USAGE))?;
    let template_body = File::new(template_path)
        .read_string()
        .await
        .with_context(|| format!("unable to read template {}", template_path))?;

    let request = DeploymentRequest::new(
        stack_name,
        template_body,
        cli_args.contains_key("named-iam"),
    );

    let options = DeployOptions::from(settings);
    info!("Running cfndeploy with options: {:?}", options);

    Ok(run(options, request, await_shutdown_signal()).await?)
}

fn print_report(report: &DeployReport, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
        }
        return;
    }

    match report.outcome {
        DeployOutcome::Converged => println!(
            "{} stack {} deployed ({} via {}) in {:.0?}",
            "ok".green().bold(),
            report.stack_name.bold(),
            report.change_set_type,
            report.change_set_name,
            report.elapsed
        ),
        DeployOutcome::NoChanges => println!(
            "{} stack {} is up to date, nothing to deploy",
            "ok".green().bold(),
            report.stack_name.bold()
        ),
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                error!("Unable to install signal handlers, falling back to Ctrl+C");
                wait_for_ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C received, shutting down..."),
        // Without a handler the deployment can only end on its own
        Err(_) => std::future::pending::<()>().await,
    }
}
