// opsdash - IT operations dashboard client
// Main entry point

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use opsdash::api::{AlertFilter, AuditLogFilter, DeviceFilter, Services, TicketFilter};
use opsdash::config::Config;
use opsdash::error::OpsdashError;
use opsdash::http::{ClientContext, HttpClient, RequestOptions};
use opsdash::logging::LogLevel;
use opsdash::session::FileStore;
use opsdash::version::build_info;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "opsdash")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Show version information
    #[arg(short = 'V', long)]
    version: bool,

    /// Show detailed build information
    #[arg(long)]
    build_info: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Work with alerts
    Alerts {
        #[command(subcommand)]
        action: AlertCommand,
    },
    /// Work with tickets
    Tickets {
        #[command(subcommand)]
        action: TicketCommand,
    },
    /// Inspect the device inventory
    Devices {
        #[command(subcommand)]
        action: DeviceCommand,
    },
    /// Show the network topology, or one device's neighbors
    Topology {
        #[arg(long)]
        device: Option<String>,
    },
    /// Query the audit log
    Audit {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Send a raw request relative to the API root
    Request {
        method: String,
        path: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
    /// Inspect the client's own log buffer
    Logs {
        #[command(subcommand)]
        action: LogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AlertCommand {
    List {
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Get { id: String },
    Ack { id: String },
    Resolve { id: String },
    Analysis { id: String },
}

#[derive(Subcommand, Debug)]
enum TicketCommand {
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
    Get { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum DeviceCommand {
    List {
        #[arg(long = "type")]
        device_type: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Get { id: String },
}

#[derive(Subcommand, Debug)]
enum LogCommand {
    Show {
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        recent: Option<usize>,
    },
    Export,
    Download {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info().format_display());
        return Ok(());
    }

    if cli.build_info {
        println!("{}", build_info().format_display());
        println!("\n{}", build_info().format_build_info());
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Initialize logging to file
    let log_path = std::env::temp_dir().join("opsdash.log");
    let log_file = std::fs::File::create(&log_path)?;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("opsdash starting, logging to {}", log_path.display());

    run(command, cli.config.map(PathBuf::from)).await
}

async fn run(command: Command, config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path)?;
    let store_path = FileStore::default_path()
        .ok_or_else(|| OpsdashError::Config("Could not determine data directory".to_string()))?;
    let store = Arc::new(FileStore::open(store_path).map_err(OpsdashError::from)?);

    let ctx = ClientContext::from_config(&config, store)?.with_listener(Arc::new(|| {
        eprintln!("Session expired. Run `opsdash login` to sign in again.");
    }));
    let api_root = config.api.api_root();
    let services = Services::new(&api_root, &ctx);

    match command {
        Command::Login { username, password } => {
            let response = services.auth.login(&username, &password).await?;
            print_json(&response.user.unwrap_or(Value::Null))?;
        }
        Command::Logout => {
            services.auth.logout().await?;
            println!("Logged out.");
        }
        Command::Whoami => print_json(&services.auth.me().await?)?,
        Command::Alerts { action } => match action {
            AlertCommand::List { severity, status, search } => {
                let filter = AlertFilter {
                    severity,
                    status,
                    search,
                    ..AlertFilter::default()
                };
                print_json(&services.alerts.list(&filter).await?)?
            }
            AlertCommand::Get { id } => print_json(&services.alerts.get(&id).await?)?,
            AlertCommand::Ack { id } => print_json(&services.alerts.acknowledge(&id).await?)?,
            AlertCommand::Resolve { id } => print_json(&services.alerts.resolve(&id).await?)?,
            AlertCommand::Analysis { id } => {
                if !config.ui.feature_enabled("ai_analysis") {
                    return Err(OpsdashError::Config("AI analysis is disabled in this deployment".to_string()).into());
                }
                print_json(&services.alerts.analysis(&id).await?)?
            }
        },
        Command::Tickets { action } => match action {
            TicketCommand::List { status, assignee } => {
                let filter = TicketFilter {
                    status,
                    assignee,
                    ..TicketFilter::default()
                };
                print_json(&services.tickets.list(&filter).await?)?
            }
            TicketCommand::Get { id } => print_json(&services.tickets.get(&id).await?)?,
            TicketCommand::Delete { id } => {
                services.tickets.delete(&id).await?;
                println!("Deleted ticket {}.", id);
            }
        },
        Command::Devices { action } => match action {
            DeviceCommand::List { device_type, search } => {
                let filter = DeviceFilter {
                    device_type,
                    search,
                    ..DeviceFilter::default()
                };
                print_json(&services.devices.list(&filter).await?)?
            }
            DeviceCommand::Get { id } => print_json(&services.devices.get(&id).await?)?,
        },
        Command::Topology { device } => match device {
            Some(id) => print_json(&services.topology.neighbors(&id).await?)?,
            None => print_json(&services.topology.graph().await?)?,
        },
        Command::Audit { user, action, page } => {
            let filter = AuditLogFilter {
                user,
                action,
                page,
                ..AuditLogFilter::default()
            };
            print_json(&services.audit.list(&filter).await?)?
        }
        Command::Request { method, path, body } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .map_err(|_| OpsdashError::InvalidArgument(format!("unknown HTTP method '{}'", method)))?;
            let mut options = RequestOptions::new(method);
            if let Some(body) = body {
                let body: Value = serde_json::from_str(&body)
                    .map_err(|e| OpsdashError::InvalidArgument(format!("--body is not valid JSON: {}", e)))?;
                options = options.body(body);
            }
            let client = HttpClient::new(api_root.as_str(), "Cli", &ctx);
            print_json(&client.request::<Value>(&path, options).await?)?
        }
        Command::Logs { action } => {
            let sink = ctx.loggers().sink();
            match action {
                LogCommand::Show { level, category, recent } => {
                    let mut entries = match &category {
                        Some(category) => sink.by_category(category),
                        None => sink.entries(),
                    };
                    if let Some(level) = level {
                        let level: LogLevel = level.parse().map_err(OpsdashError::InvalidArgument)?;
                        entries.retain(|entry| entry.level == level);
                    }
                    if let Some(count) = recent {
                        let skip = entries.len().saturating_sub(count);
                        entries = entries.split_off(skip);
                    }
                    print_json(&entries)?
                }
                LogCommand::Export => println!("{}", sink.export_json()?),
                LogCommand::Download { dir } => {
                    let path = sink.download(&dir)?;
                    println!("Logs written to {}", path.display());
                }
                LogCommand::Clear => {
                    sink.clear();
                    println!("Logs cleared.");
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
