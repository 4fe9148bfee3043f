mod api;
mod config;
mod poll;
mod render;

use clap::{Args, Parser, Subcommand};
use livemap::camera::Point;
use livemap::engine::MapEngine;
use livemap::input::WheelDelta;
use livemap::prefs::{DotSize, FileStore, MapPrefs, PrefsError};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::types::{AdminAction, ModerationAction, ModerationRequest, ServerAction, ServerModerationRequest};
use crate::api::{ApiClient, ApiError};
use crate::config::{ConfigError, DashConfig};
use crate::poll::LivePoller;

const DEFAULT_LOG_FILTER: &str = "netdash=info,livemap=info";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("preferences: {0}")]
    Prefs(#[from] PrefsError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("refusing to shut down {0} without --yes; all players will be kicked")]
    ShutdownNotConfirmed(String),
}

#[derive(Parser, Debug)]
#[command(name = "netdash", about = "Network operations dashboard client")]
struct Cli {
    /// Dashboard API base URL.
    #[arg(long, global = true, env = "NETDASH_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Live map of one server, redrawn on every poll.
    Map(MapArgs),
    /// List live servers.
    Servers,
    Summary,
    /// Show the signed-in staff member.
    Whoami,
    Logout,
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    Player {
        roblox_user_id: i64,
    },
    Moderate(ModerateArgs),
    /// Server-wide announcements and shutdowns.
    Server(ServerCommand),
    Admin(AdminCommand),
    Prefs(PrefsCommand),
}

#[derive(Args, Debug)]
struct MapArgs {
    /// Virtual viewport width in pixels.
    #[arg(long, default_value_t = 1000.0)]
    width: f64,
    #[arg(long, default_value_t = 800.0)]
    height: f64,
    #[arg(long, default_value_t = 80)]
    cols: usize,
    #[arg(long, default_value_t = 32)]
    rows: usize,
    /// Server id to show; defaults to the first live server.
    #[arg(long)]
    server: Option<String>,
    #[arg(long, default_value_t = 0)]
    zoom_in: u32,
    #[arg(long, default_value_t = 0)]
    zoom_out: u32,
    /// Zoom as a wheel at this pointer position instead of the viewport center.
    #[arg(long, requires = "cursor_y")]
    cursor_x: Option<f64>,
    #[arg(long, requires = "cursor_x")]
    cursor_y: Option<f64>,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_y: f64,
    /// Highlight this player.
    #[arg(long)]
    pin: Option<i64>,
    /// Draw one frame and exit.
    #[arg(long, default_value_t = false)]
    once: bool,
}

#[derive(Args, Debug)]
struct ModerateArgs {
    #[arg(value_enum)]
    action: ModerationAction,
    target_user_id: i64,
    #[arg(long)]
    server: Option<String>,
    #[arg(long)]
    reason: Option<String>,
    /// Text shown to the player (message and alert).
    #[arg(long)]
    message: Option<String>,
    /// Acting staff id; defaults to the signed-in user.
    #[arg(long)]
    moderator: Option<i64>,
}

#[derive(Args, Debug)]
struct ServerCommand {
    #[command(subcommand)]
    command: ServerSubcommand,
}

#[derive(Subcommand, Debug)]
enum ServerSubcommand {
    /// Broadcast a message to every player on the server.
    Announce {
        server_id: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Shut the server down, kicking all players.
    Shutdown {
        server_id: String,
        #[arg(long)]
        message: Option<String>,
        /// Confirm the shutdown.
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    List,
    UnlinkRoblox { user_id: i64 },
    UnlinkDiscord { user_id: i64 },
    /// Revoke every session of the account.
    Logout { user_id: i64 },
    IpBan {
        user_id: i64,
        #[arg(long)]
        reason: Option<String>,
    },
    Delete { user_id: i64 },
}

#[derive(Args, Debug)]
struct PrefsCommand {
    #[command(subcommand)]
    command: PrefsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PrefsSubcommand {
    Show,
    Set {
        #[arg(long)]
        dot_size: Option<DotSize>,
        #[arg(long)]
        zoom_to_cursor: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Command::Prefs(prefs) = cli.command {
        return run_prefs(prefs);
    }

    let config = DashConfig::from_env(cli.api_url)?;
    let client = ApiClient::new(&config)?;
    info!(api_url = client.base_url(), "dashboard client ready");

    match cli.command {
        Command::Map(args) => run_map(&config, client, args).await,
        Command::Servers => {
            println!("{}", render::render_servers(&client.live_players().await?));
            Ok(())
        }
        Command::Summary => {
            println!("{}", render::render_summary(&client.summary().await?));
            Ok(())
        }
        Command::Whoami => {
            match client.me().await? {
                Some(user) => print_json(&user)?,
                None => println!("not signed in"),
            }
            Ok(())
        }
        Command::Logout => {
            client.logout().await?;
            println!("signed out");
            Ok(())
        }
        Command::Search { query } => print_json(&client.search_players(&query).await?),
        Command::Player { roblox_user_id } => print_json(&client.player_detail(roblox_user_id).await?),
        Command::Moderate(args) => run_moderate(&client, args).await,
        Command::Server(server) => run_server(&client, server).await,
        Command::Admin(admin) => run_admin(&client, admin).await,
        Command::Prefs(_) => Ok(()),
    }
}

async fn run_map(config: &DashConfig, client: ApiClient, args: MapArgs) -> Result<(), CliError> {
    let store = FileStore::new(&config.prefs_path);
    let mut engine = MapEngine::with_prefs(MapPrefs::load(&store));
    engine.set_viewport(args.width, args.height);
    if let Some(server) = args.server {
        engine.select_server(server);
    }

    let cursor = args.cursor_x.zip(args.cursor_y).map(|(x, y)| Point::new(x, y));
    for _ in 0..args.zoom_in {
        match cursor {
            Some(pt) => engine.on_wheel(pt, WheelDelta { dx: 0.0, dy: -1.0 }),
            None => engine.zoom_in(),
        };
    }
    for _ in 0..args.zoom_out {
        match cursor {
            Some(pt) => engine.on_wheel(pt, WheelDelta { dx: 0.0, dy: 1.0 }),
            None => engine.zoom_out(),
        };
    }
    engine.pan_by(args.pan_x, args.pan_y);
    if args.pin.is_some() {
        engine.pin_player(args.pin);
    }

    let poller = LivePoller::spawn(client, config.poll_interval);
    let mut rx = poller.subscribe();
    let mut drawn_generation = 0;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }

        let state = rx.borrow_and_update().clone();
        if state.generation == drawn_generation {
            continue;
        }
        drawn_generation = state.generation;
        if let Some(data) = state.data {
            engine.load_snapshot(data);
        }
        if !args.once {
            print!("\x1b[2J\x1b[H");
        }
        println!("{}", render::render_map(&engine, args.cols, args.rows));
        if let Some(error) = state.error {
            println!("error: {error}");
        }
        if args.once {
            break;
        }
    }
    Ok(())
}

async fn run_moderate(client: &ApiClient, args: ModerateArgs) -> Result<(), CliError> {
    let moderator = match args.moderator {
        Some(id) => Some(id),
        None => client.me().await?.map(|user| user.roblox_user_id),
    };
    let text = if args.action.takes_message() { args.message } else { args.reason };
    let request = ModerationRequest::new(args.action, args.target_user_id, args.server, moderator, text)?;
    client.moderate(args.action, &request).await?;
    println!("{} sent for {}", args.action.path(), args.target_user_id);
    Ok(())
}

async fn run_server(client: &ApiClient, server: ServerCommand) -> Result<(), CliError> {
    let (action, request) = match server.command {
        ServerSubcommand::Announce { server_id, message } => {
            (ServerAction::Announce, ServerModerationRequest::new(server_id, message))
        }
        ServerSubcommand::Shutdown { server_id, message, yes } => {
            if !yes {
                return Err(CliError::ShutdownNotConfirmed(server_id));
            }
            (ServerAction::Shutdown, ServerModerationRequest::new(server_id, message))
        }
    };
    client.server_action(action, &request).await?;
    println!("{} sent for {}", action.path(), request.server_id);
    Ok(())
}

async fn run_admin(client: &ApiClient, admin: AdminCommand) -> Result<(), CliError> {
    let (action, user_id, reason) = match admin.command {
        AdminSubcommand::List => return print_json(&client.admin_users().await?),
        AdminSubcommand::UnlinkRoblox { user_id } => (AdminAction::UnlinkRoblox, user_id, None),
        AdminSubcommand::UnlinkDiscord { user_id } => (AdminAction::UnlinkDiscord, user_id, None),
        AdminSubcommand::Logout { user_id } => (AdminAction::ForceLogout, user_id, None),
        AdminSubcommand::IpBan { user_id, reason } => (AdminAction::IpBan, user_id, reason),
        AdminSubcommand::Delete { user_id } => (AdminAction::Delete, user_id, None),
    };
    match client.admin_action(action, user_id, reason.as_deref()).await {
        Err(ApiError::Status { status: 404, .. }) => Err(CliError::NotFound(format!("no dashboard user {user_id}"))),
        result => {
            result?;
            println!("done");
            Ok(())
        }
    }
}

fn run_prefs(prefs: PrefsCommand) -> Result<(), CliError> {
    let mut store = FileStore::new(config::prefs_path_from_env());
    let mut current = MapPrefs::load(&store);
    match prefs.command {
        PrefsSubcommand::Show => {}
        PrefsSubcommand::Set { dot_size, zoom_to_cursor } => {
            if let Some(size) = dot_size {
                current.dot_size = size;
            }
            if let Some(on) = zoom_to_cursor {
                current.zoom_to_cursor = on;
            }
            current.try_save(&mut store)?;
        }
    }
    println!("file:           {}", store.path().display());
    println!("dot size:       {} ({}px)", current.dot_size, current.dot_size.px());
    println!("zoom to cursor: {}", current.zoom_to_cursor);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
