use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use ae_bridge::config::{
    resolve_config, BridgeSettings, MailboxConfig, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_STALE_REQUEST_AGE_SECS, DEFAULT_TIMEOUT_MS,
};
use ae_bridge::{logging, BridgeError, Mailbox, ScriptExecutor};

#[derive(Parser, Debug)]
#[command(name = "ae-bridge", version)]
struct Cli {
    /// Mailbox folder (overrides AE_MCP_FOLDER)
    #[arg(long, global = true)]
    folder: Option<PathBuf>,

    /// Give up waiting for a response after this many milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Response poll interval in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_ms: u64,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the mailbox paths and the host heartbeat.
    Status,
    /// Round trip a ping through the host.
    Ping,
    /// Run a script in the host and print its JSON result.
    Exec(ExecArgs),
    /// Remove request files the host never picked up.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["file", "eval"]))]
struct ExecArgs {
    /// Script file to run.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Script text to run.
    #[arg(long)]
    eval: Option<String>,

    /// JSON object exposed to the script as `params`.
    #[arg(long)]
    params: Option<String>,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Minimum age in seconds before a request counts as stale.
    #[arg(long, default_value_t = DEFAULT_STALE_REQUEST_AGE_SECS)]
    max_age_secs: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<BridgeError>() {
                Some(bridge) => eprintln!("error [{}]: {:#}", bridge.phase(), e),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mailbox = build_mailbox(&cli)?;
    match cli.cmd {
        Command::Status => cmd_status(&mailbox),
        Command::Ping => {
            mailbox.ping()?;
            println!("pong");
            Ok(ExitCode::SUCCESS)
        }
        Command::Exec(args) => cmd_exec(mailbox, args),
        Command::Sweep(args) => {
            let removed = mailbox.sweep_stale_requests(Duration::from_secs(args.max_age_secs))?;
            println!("removed {} stale request(s)", removed);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_mailbox(cli: &Cli) -> anyhow::Result<Mailbox> {
    let config = match &cli.folder {
        Some(folder) => MailboxConfig::from_base(folder),
        None => resolve_config()?,
    };
    let settings = BridgeSettings::new(
        Duration::from_millis(cli.poll_ms),
        Duration::from_millis(cli.timeout_ms),
    )?;
    Ok(Mailbox::new(config, settings)?)
}

fn cmd_status(mailbox: &Mailbox) -> anyhow::Result<ExitCode> {
    let config = mailbox.config();
    println!("base:      {}", config.base_folder().display());
    println!("requests:  {}", config.requests_folder().display());
    println!("responses: {}", config.responses_folder().display());
    println!("info file: {}", config.info_file().display());
    println!("log file:  {}", logging::log_path().display());

    match mailbox.host_info()? {
        Some(info) => {
            println!("heartbeat: {}", serde_json::to_string_pretty(&info)?);
            if info.is_running() {
                Ok(ExitCode::SUCCESS)
            } else {
                println!("host is not running");
                Ok(ExitCode::FAILURE)
            }
        }
        None => {
            println!("heartbeat: missing");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_exec(mailbox: Mailbox, args: ExecArgs) -> anyhow::Result<ExitCode> {
    let script = match (&args.file, args.eval) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?,
        (None, Some(text)) => text,
        (None, None) => anyhow::bail!("one of --file or --eval is required"),
    };

    let executor = ScriptExecutor::new(mailbox);
    let result = match args.params.as_deref() {
        Some(raw) => executor.execute_with_params(&script, &parse_params(raw)?)?,
        None => executor.execute(&script)?,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::SUCCESS)
}

fn parse_params(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BridgeError::invalid_params("--params must be a JSON object").into()),
        Err(e) => Err(BridgeError::invalid_params(format!("--params is not valid JSON: {}", e)).into()),
    }
}
