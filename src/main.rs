mod api;
mod app;
mod config;
mod constants;
mod controller;
mod credentials;
mod input;
mod model;
mod route;
mod store;
mod ui;

use anyhow::Result;
use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::Config;
use crate::credentials::CredentialStore;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter =
        EnvFilter::try_from_env("GUST_LOG").unwrap_or_else(|_| EnvFilter::new("info,gust=debug"));

    // The terminal is taken over by the UI, so logs go to a file in the
    // config directory.
    let log_file = Config::config_dir()
        .ok()
        .map(|dir| dir.join("gust.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"gust - terminal mail client

Usage: gust [command]

Commands:
    (none)      Start the client
    auth        Configure the account and store the API token
    help        Show this help message

Configuration file: ~/.config/gust/config.toml
The API token can also be supplied via the GUST_TOKEN environment variable.
"#
    );
}

async fn run_auth() -> Result<()> {
    use std::io::{self, Write};

    println!("Gust account setup");
    println!("==================\n");

    let config_path = Config::config_path()?;
    if config_path.exists() {
        print!("Configuration already exists. Overwrite? [y/N]: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    let email = loop {
        print!("Email address: ");
        io::stdout().flush()?;
        let mut email = String::new();
        io::stdin().read_line(&mut email)?;
        let email = email.trim().to_string();

        if is_valid_email(&email) {
            break email;
        }
        println!("Invalid email format. Please enter a valid address (e.g., user@example.com)");
    };

    print!("Display name (optional): ");
    io::stdout().flush()?;
    let mut display_name = String::new();
    io::stdin().read_line(&mut display_name)?;
    let display_name = display_name.trim();
    let display_name = if display_name.is_empty() {
        None
    } else {
        Some(display_name.to_string())
    };

    print!("API base URL [{}]: ", config::ApiConfig::default().base_url);
    io::stdout().flush()?;
    let mut base_url = String::new();
    io::stdin().read_line(&mut base_url)?;
    let base_url = base_url.trim();

    print!("API token: ");
    io::stdout().flush()?;
    let token = read_hidden()?;
    println!();

    let mut config = Config {
        account: config::AccountConfig {
            email: email.clone(),
            display_name,
        },
        api: config::ApiConfig::default(),
        ui: config::UiConfig::default(),
    };
    if !base_url.is_empty() {
        config.api.base_url = base_url.to_string();
    }

    Config::ensure_dirs()?;
    config.save()?;
    println!("Configuration saved to {}", config_path.display());

    let creds = CredentialStore::new(&email);
    creds.set_token(&token)?;

    if creds.has_credentials() {
        println!("Token stored successfully.");
    } else {
        eprintln!("Warning: failed to store the token.");
        eprintln!("{}", creds.debug_info());
        return Err(anyhow::anyhow!("Credential storage failed"));
    }

    println!("\nSetup complete! Run 'gust' to start.");
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

fn read_hidden() -> Result<String> {
    use std::io;

    // Disable echo while the token is typed
    let _guard = DisableEcho::new()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut updated = original;
            updated.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &updated) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = std::io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("auth") => run_auth().await,
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging();

            let config = Config::load()?;
            Config::ensure_dirs()?;

            let creds = CredentialStore::new(&config.account.email);
            if !creds.has_credentials() {
                eprintln!("No API token found for {}.", config.account.email);
                eprintln!("The client will start unauthorized; sign-in instructions are shown.");
                eprintln!("To fix now: run 'gust auth', or export GUST_TOKEN.");
            }

            let mut app = App::new(config, creds)?;
            app.run().await
        }
    }
}
