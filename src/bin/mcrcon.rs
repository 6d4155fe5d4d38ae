//! mcrcon CLI
//!
//! Runs one command or an interactive shell against a Minecraft server.

use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;

use clap::Parser;
use mcrcon::completer::LOCAL_COMMANDS;
use mcrcon::config::DEFAULT_PORT;
use mcrcon::credentials::{CredentialProvider, EnvPassword, StaticPassword, DEFAULT_PASSWORD_VAR};
use mcrcon::discovery::RefreshEvent;
use mcrcon::format::strip_formatting;
use mcrcon::{
    BackgroundRefresher, CacheStore, Completer, CompletionState, Config, Connection, RconError,
    ReconnectingConnection,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Minecraft RCON client
#[derive(Parser, Debug)]
#[command(name = "mcrcon")]
#[command(about = "Minecraft RCON client with command discovery")]
#[command(version)]
struct Args {
    /// Server as host or host:port
    server: String,

    /// RCON password (prefer --password-env)
    #[arg(short, long)]
    password: Option<String>,

    /// Environment variable holding the password
    #[arg(long, default_value = DEFAULT_PASSWORD_VAR)]
    password_env: String,

    /// Run a single command and exit
    #[arg(short, long)]
    command: Option<String>,

    /// Socket timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Do not read or write the command cache
    #[arg(long)]
    no_cache: bool,

    /// Cache directory
    #[arg(long)]
    cache_dir: Option<String>,
}

fn main() {
    // Logs go to stderr so command output stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mcrcon=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let (host, port) = match split_server(&args.server) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("mcrcon: {}", e);
            process::exit(2);
        }
    };
    let mut builder = Config::builder()
        .host(host)
        .port(port)
        .timeout_ms(args.timeout.saturating_mul(1000));
    if let Some(dir) = &args.cache_dir {
        builder = builder.cache_dir(dir);
    }
    let config = builder.build();

    let password = match resolve_password(&args) {
        Ok(password) => password,
        Err(e) => {
            eprintln!("mcrcon: {}", e);
            process::exit(1);
        }
    };

    let mut rcon =
        ReconnectingConnection::new(Connection::from_config(&config), password.clone(), config.backoff);

    if let Err(e) = rcon.authenticate() {
        eprintln!("mcrcon: cannot log in to {}:{}: {}", config.host, config.port, e);
        process::exit(1);
    }
    tracing::info!("Connected to {}:{}", config.host, config.port);

    if let Some(command) = &args.command {
        match rcon.execute(command) {
            Ok(response) => print_response(&response),
            Err(e) => {
                eprintln!("mcrcon: {}", e);
                process::exit(1);
            }
        }
        rcon.close();
        return;
    }

    let cache = (!args.no_cache).then(|| CacheStore::new(&config.cache_dir));
    run_shell(&config, &password, rcon, cache);
}

/// Interactive shell
///
/// A line ending in a tab prints completions for that line instead of
/// running it.
fn run_shell(
    config: &Config,
    password: &str,
    mut rcon: ReconnectingConnection,
    cache: Option<CacheStore>,
) {
    let state = match cache.as_ref().and_then(|c| c.load(&config.server_key())) {
        Some(model) => {
            tracing::info!("Loaded {} cached commands", model.len());
            Arc::new(CompletionState::with_model(model))
        }
        None => Arc::new(CompletionState::new()),
    };

    let completer = Completer::new(Arc::clone(&state));
    let mut refresher = start_refresher(config, password, &state, &cache);

    println!(
        "Connected to {}:{}. Local commands: {}",
        config.host,
        config.port,
        LOCAL_COMMANDS.join(", ")
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        report_events(refresher.as_ref());
        print!("> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
            None => break,
        };

        if let Some(partial) = line.strip_suffix('\t') {
            for candidate in completer.complete(partial) {
                println!("{}", candidate);
            }
            continue;
        }

        match line.trim() {
            "" => continue,
            "exit" | "quit" => break,
            "reconnect" => {
                // Stop the old background connection before replacing it
                drop(refresher.take());
                match rcon.reconnect() {
                    Ok(()) => {
                        println!("Reconnected");
                        refresher = start_refresher(config, password, &state, &cache);
                    }
                    Err(e) => eprintln!("Reconnect failed: {}", e),
                }
            }
            command => match rcon.execute(command) {
                Ok(response) => print_response(&response),
                Err(RconError::ReconnectExhausted { attempts }) => eprintln!(
                    "Connection lost after {} reconnect attempts; type `reconnect` to try again",
                    attempts
                ),
                Err(e) => eprintln!("Error: {}", e),
            },
        }
    }

    drop(refresher);
    rcon.close();
}

fn start_refresher(
    config: &Config,
    password: &str,
    state: &Arc<CompletionState>,
    cache: &Option<CacheStore>,
) -> Option<BackgroundRefresher> {
    match BackgroundRefresher::spawn(config, password, Arc::clone(state), cache.clone()) {
        Ok(refresher) => Some(refresher),
        Err(e) => {
            tracing::warn!("Completions unavailable: {}", e);
            None
        }
    }
}

/// Show queued background failures before the next prompt
fn report_events(refresher: Option<&BackgroundRefresher>) {
    let Some(refresher) = refresher else { return };

    for event in refresher.events().try_iter() {
        match event {
            RefreshEvent::DiscoveryFailed(e) => eprintln!("Command discovery failed: {}", e),
            RefreshEvent::CommandsUpdated(count) => {
                tracing::debug!("Completions updated with {} commands", count)
            }
            RefreshEvent::PlayersUpdated(_) | RefreshEvent::PlayersFailed(_) => {}
        }
    }
}

/// "host", "host:port" or "[v6addr]:port"
fn split_server(server: &str) -> mcrcon::Result<(String, u16)> {
    let server = server.trim();

    let (host, port) = match server.rsplit_once(':') {
        // Bare IPv6 address without brackets
        Some((host, _)) if host.contains(':') && !host.ends_with(']') => (server, DEFAULT_PORT),
        Some((host, port)) => {
            let port = port
                .parse()
                .map_err(|_| RconError::Config(format!("Invalid port in {:?}", server)))?;
            (host, port)
        }
        None => (server, DEFAULT_PORT),
    };

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(RconError::Config(format!("Missing host in {:?}", server)));
    }
    Ok((host.to_string(), port))
}

fn resolve_password(args: &Args) -> mcrcon::Result<String> {
    match &args.password {
        Some(password) => StaticPassword::new(password.as_str()).password(),
        None => EnvPassword::new(args.password_env.as_str()).password(),
    }
}

fn print_response(response: &str) {
    let text = strip_formatting(response);
    if text.is_empty() {
        return;
    }
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}
