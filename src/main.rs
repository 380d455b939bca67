use specprobe::cli::{CliArgs, Commands, ProbeArgs, SchemaArgs};
use specprobe::{openapi, probe, NAME, VERSION};

use clap::Parser;
use std::env;
use std::process;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::process::Command;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Schema(schema_args) => handle_schema(schema_args).await,
        Commands::Probe(probe_args) => handle_probe(probe_args).await,
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level_str) = &args.log_level {
            parse_level(level_str)
        } else if args.verbose {
            Level::DEBUG
        } else if args.quiet {
            Level::ERROR
        } else {
            let level_str = env::var("SPECPROBE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            parse_level(&level_str)
        };

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter
                .add_directive(format!("specprobe={}", level).parse().unwrap())
                .add_directive("h2=warn".parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap());
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

async fn handle_schema(args: &SchemaArgs) -> i32 {
    info!("Inspecting OpenAPI endpoint {}", args.endpoint);

    let timeout = Duration::from_secs(args.timeout);
    let doc = match openapi::fetch_document(&args.url, timeout).await {
        Ok(doc) => doc,
        Err(e) => {
            error!("Failed to fetch OpenAPI document: {:#}", e);
            return 1;
        }
    };

    match openapi::endpoint_report(&doc, &args.endpoint) {
        Ok(report) => {
            println!("{}", report.trim_end());
            0
        }
        Err(e) => {
            error!("Failed to inspect endpoint: {:#}", e);
            1
        }
    }
}

async fn handle_probe(args: &ProbeArgs) -> i32 {
    info!(
        "Probing proxy {} for tool '{}'",
        args.executable.display(),
        args.tool
    );

    let mut child = match Command::new(&args.executable)
        .arg(&args.url)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            error!(
                "Failed to spawn proxy process {}: {}",
                args.executable.display(),
                e
            );
            return 1;
        }
    };

    let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
        error!("Proxy process pipes were not attached");
        terminate(&mut child).await;
        return 1;
    };

    match probe::run_session(BufReader::new(stdout), stdin).await {
        Ok(raw_line) => {
            println!("{}", probe::tools_report(&raw_line, &args.tool).trim_end());
        }
        Err(e) => {
            println!("Error during proxy session: {}", e);
        }
    }

    terminate(&mut child).await;
    0
}

async fn terminate(child: &mut tokio::process::Child) {
    if let Err(e) = child.kill().await {
        debug!("Failed to terminate proxy process: {}", e);
    }
}
