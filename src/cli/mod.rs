//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and routes into the chat
//! interface or the maintenance subcommands.

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::auth::KeyringTokenStore;
use crate::core::config::Config;
use crate::core::language::Language;
use crate::core::session::Session;
use crate::ui::chat_loop::{run_chat, ChatSetup};
use crate::utils::logging::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(name = "moodline")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal chat client with mood tracking")]
#[command(
    long_about = "Moodline is a full-screen terminal client for a mood-aware support chat \
service. Messages you send are answered with sentiment-tagged replies, and your \
sentiment history is drawn as a line chart alongside the conversation.\n\n\
Session:\n\
  Log in (or register) from the start screen. The session token is stored in \
your system keyring and reused on the next start; use 'moodline logout' or \
Ctrl+D in the app to end the session.\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through the conversation\n\
  Ctrl+G            Cycle the outgoing message language (en/es/fr)\n\
  Ctrl+D            Log out\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the mood service (overrides the configured value)
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Language for outgoing messages: en, es, or fr
    #[arg(short = 'L', long, global = true, value_name = "LANG")]
    pub language: Option<Language>,

    /// Append the conversation transcript to the given file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Clear the stored session token
    Logout,
    /// Set a configuration value, or show the configuration when no key is
    /// given
    Set {
        /// Configuration key: server-url or language
        key: Option<String>,
        /// Value to assign to the key
        value: Option<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();
    let config = Config::load()?;

    match args.command {
        Some(Commands::Logout) => logout(),
        Some(Commands::Set { key, value }) => set_config(config, key, value),
        Some(Commands::Chat) | None => {
            let setup = ChatSetup {
                server_url: args
                    .server
                    .unwrap_or_else(|| config.server_url().to_string()),
                language: args.language.unwrap_or_else(|| config.language()),
                log_file: args.log,
            };
            run_chat(setup).await
        }
    }
}

fn logout() -> Result<(), Box<dyn Error>> {
    let mut session = Session::load(Box::new(KeyringTokenStore::new()));
    if session.is_authenticated() {
        session.clear_token()?;
        println!("✅ Logged out; the stored session token was removed.");
    } else {
        println!("No stored session to clear.");
    }
    Ok(())
}

fn set_config(
    mut config: Config,
    key: Option<String>,
    value: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let Some(key) = key else {
        config.print_all();
        return Ok(());
    };
    let Some(value) = value else {
        return Err(format!("missing value for config key '{key}'").into());
    };
    config.set_value(&key, &value)?;
    config.save()?;
    println!("✅ {key} set to {value}");
    Ok(())
}
