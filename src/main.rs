use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use portal_client::config::{ConfigError, DonationsConfig, HttpTimeouts, PortalConfig, trim_base_url};
use portal_client::donations::{Dashboard, DonationError, DonationForm, DonationKind, RestClient, TerminalView};
use portal_client::portal::hr::CHECK_IN;
use portal_client::portal::session::{load_me, login, logout, require_auth};
use portal_client::portal::{
    Announcement, ApiClient, ApiError, FileTokenStore, LoggingNavigator, NewUser, RequestBody, RequestOptions,
    TokenStore,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Donation(#[from] DonationError),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cannot read {}: {source}", path.display())]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("not authenticated; redirected to {0}")]
    Unauthenticated(String),
}

#[derive(Parser, Debug)]
#[command(name = "portal", about = "HR portal and donation dashboard client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Portal(PortalCommand),
    Donations(DonationsCommand),
}

// =============================================================================
// PORTAL ARGS
// =============================================================================

#[derive(Args, Debug)]
struct PortalCommand {
    #[arg(long, env = "PORTAL_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "PORTAL_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: PortalSubcommand,
}

#[derive(Subcommand, Debug)]
enum PortalSubcommand {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD")]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD")]
        password: String,
        #[arg(long)]
        department: Option<String>,
    },
    Logout,
    /// Exit with an error when no token is stored.
    Guard,
    Me,
    Request {
        method: String,
        path: String,
        #[arg(long)]
        data: Option<String>,
    },
    Announcements,
    /// Publish an announcement (admin only).
    Announce {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    Vacations,
    RequestVacation {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    Payslips,
    UploadPayslip {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        file: PathBuf,
    },
    TimeEntries,
    ClockIn {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long, default_value = CHECK_IN)]
        entry_type: String,
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

// =============================================================================
// DONATION ARGS
// =============================================================================

#[derive(Args, Debug)]
struct DonationsCommand {
    #[arg(long, env = "DONATIONS_URL")]
    url: Option<String>,

    #[arg(long, env = "DONATIONS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: DonationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DonationsSubcommand {
    /// Print the donation table.
    List,
    /// Print totals per donation type as a bar chart.
    Chart,
    /// Print the table and the chart.
    Show,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        kind: DonationKind,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        date: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Portal(portal) => run_portal(portal).await,
        Command::Donations(donations) => run_donations(donations).await,
    }
}

// =============================================================================
// PORTAL
// =============================================================================

async fn run_portal(cmd: PortalCommand) -> Result<(), CliError> {
    let mut config = PortalConfig::from_env();
    if let Some(base_url) = cmd.base_url {
        config.base_url = trim_base_url(&base_url);
    }
    let token_file = cmd
        .token_file
        .unwrap_or_else(|| PathBuf::from(&config.token_file));
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(token_file));
    let client = ApiClient::from_config(&config, store.clone())?;
    let navigator = LoggingNavigator::default();

    match cmd.command {
        PortalSubcommand::Login { email, password } => {
            login(&client, &email, &password).await?;
            println!("ok");
        }
        PortalSubcommand::Register { name, email, password, department } => {
            let user = NewUser { name: &name, email: &email, password: &password, department: department.as_deref() };
            print_json(&client.register(&user).await?)?;
        }
        PortalSubcommand::Logout => {
            logout(store.as_ref(), &navigator)?;
            println!("ok");
        }
        PortalSubcommand::Guard => {
            if !require_auth(store.as_ref(), &navigator) {
                return Err(unauthenticated(&navigator));
            }
            println!("ok");
        }
        PortalSubcommand::Me => {
            let Some(me) = load_me(&client, &navigator).await else {
                return Err(unauthenticated(&navigator));
            };
            print_json(&me)?;
        }
        PortalSubcommand::Request { method, path, data } => {
            let method = reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| CliError::InvalidMethod(method.clone()))?;
            let body = match data {
                Some(raw) => RequestBody::Json(serde_json::from_str(&raw)?),
                None => RequestBody::Empty,
            };
            let value = client
                .request(&path, RequestOptions { method, body, ..RequestOptions::default() })
                .await?;
            print_json(&value)?;
        }
        PortalSubcommand::Announcements => print_json(&client.announcements().await?)?,
        PortalSubcommand::Announce { title, content } => {
            client.publish_announcement(&Announcement { title, content }).await?;
            println!("ok");
        }
        PortalSubcommand::Vacations => print_json(&client.my_vacations().await?)?,
        PortalSubcommand::RequestVacation { start, end } => {
            client.request_vacation(&start, &end).await?;
            println!("ok");
        }
        PortalSubcommand::Payslips => print_json(&client.my_payslips().await?)?,
        PortalSubcommand::UploadPayslip { month, year, file } => {
            let (file_name, contents) = read_upload(&file, "holerite.pdf")?;
            let url = client
                .upload_payslip(month, year, &file_name, contents)
                .await?;
            print_json(&serde_json::json!({ "ok": true, "url": url }))?;
        }
        PortalSubcommand::TimeEntries => print_json(&client.my_time_entries().await?)?,
        PortalSubcommand::ClockIn { lat, lng, entry_type, photo } => {
            let id = match photo.map(|path| read_upload(&path, "foto.jpg")).transpose()? {
                Some((name, contents)) => client.clock_in(lat, lng, &entry_type, Some((name.as_str(), contents))).await?,
                None => client.clock_in(lat, lng, &entry_type, None).await?,
            };
            print_json(&serde_json::json!({ "ok": true, "id": id }))?;
        }
    }
    Ok(())
}

/// File name and contents of a file to upload.
fn read_upload(path: &Path, fallback_name: &str) -> Result<(String, Vec<u8>), CliError> {
    let contents = std::fs::read(path).map_err(|source| CliError::ReadFile { path: path.to_path_buf(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| fallback_name.to_owned(), |n| n.to_string_lossy().into_owned());
    Ok((file_name, contents))
}

fn unauthenticated(navigator: &LoggingNavigator) -> CliError {
    CliError::Unauthenticated(navigator.last_target().unwrap_or_default())
}

// =============================================================================
// DONATIONS
// =============================================================================

async fn run_donations(cmd: DonationsCommand) -> Result<(), CliError> {
    let config = match (cmd.url, cmd.api_key) {
        (Some(url), Some(api_key)) => {
            DonationsConfig { base_url: trim_base_url(&url), api_key, timeouts: HttpTimeouts::from_env() }
        }
        _ => DonationsConfig::from_env()?,
    };
    let backend = RestClient::from_config(&config)?;
    let mut dashboard = Dashboard::new(backend, TerminalView::new(std::io::stdout()));

    match cmd.command {
        DonationsSubcommand::List => {
            dashboard.refresh_table().await?;
        }
        DonationsSubcommand::Chart => {
            dashboard.refresh_tally().await?;
        }
        DonationsSubcommand::Show => dashboard.load().await.into_result()?,
        DonationsSubcommand::Add { name, contact, kind, quantity, date } => {
            let mut form = DonationForm { donor_name: name, contact, kind: kind.label().to_owned(), quantity, date };
            dashboard.submit(&mut form).await?.into_result()?;
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
