//! `nuorder` command line.
//!
//! Hostname and credentials come from the `[sandbox]` section of
//! `~/.config/nuorder.ini` unless another section is picked with `-c`; any of
//! them can be overridden by a flag.
//!
//! ```text
//! nuorder get /api/companies/codes/list
//! nuorder put /api/product/new/force -d - < product.json
//! ```

mod interact;

use std::fmt::Display;
use std::io::{self, BufRead, Read, Write};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::client::{Client, Payload, RequestDescriptor};
use crate::config::{IniConfig, Overrides, Profile, DEFAULT_SECTION, KEY_APP_NAME};
use crate::transport::Method;

pub use interact::{parse_line, run_session, SessionCommand};

const STDIN_MARKER: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "nuorder")]
#[command(about = "Signed requests to the NuOrder API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new OAuth token and secret
    ///
    /// Interactive: the pending application has to be approved in the
    /// NuOrder admin before the verification code can be pasted.
    Initiate(InitiateArgs),
    /// Line based session for issuing several requests
    Interact(InteractArgs),
    /// Make a GET request to NuOrder
    Get(ReadArgs),
    /// Make a DELETE request to NuOrder
    Delete(ReadArgs),
    /// Make a POST request to NuOrder
    Post(WriteArgs),
    /// Make a PUT request to NuOrder
    Put(WriteArgs),
}

impl Commands {
    pub fn connection(&self) -> &ConnectionArgs {
        match self {
            Commands::Initiate(args) => &args.connection,
            Commands::Interact(args) => &args.connection,
            Commands::Get(args) | Commands::Delete(args) => &args.connection,
            Commands::Post(args) | Commands::Put(args) => &args.connection,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// E.g. wholesale.sandbox1.nuorder.com for sandbox
    #[arg(long)]
    pub hostname: Option<String>,

    /// The consumer key to use
    #[arg(long)]
    pub consumer_key: Option<String>,

    /// The OAuth shared secret to use
    #[arg(long)]
    pub consumer_secret: Option<String>,

    /// The name of the config section to get settings from
    #[arg(short = 'c', long, default_value = DEFAULT_SECTION)]
    pub config_section: String,

    /// The log level to use (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// OAuth token
    #[arg(long)]
    pub oauth_token: Option<String>,

    /// OAuth token secret
    #[arg(long)]
    pub oauth_token_secret: Option<String>,
}

#[derive(Args, Debug)]
pub struct InitiateArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The application name
    #[arg(long)]
    pub app_name: Option<String>,

    /// Don't actually run the command, just show what would be run
    #[arg(long)]
    pub dry_run: bool,
}

impl InitiateArgs {
    /// `--app-name`, or `app_name` from the profile when the flag is unset or empty.
    pub fn app_name(&self, profile: &Profile<'_>) -> crate::Result<String> {
        match self.app_name.clone().filter(|s| !s.is_empty()) {
            Some(name) => Ok(name),
            None => profile.get(KEY_APP_NAME),
        }
    }
}

#[derive(Args, Debug)]
pub struct InteractArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub token: TokenArgs,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// The endpoint to interact with, e.g. /api/companies/codes/list
    pub endpoint: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub token: TokenArgs,

    /// Don't actually run the command, just show what would be run
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// The endpoint to interact with
    pub endpoint: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub token: TokenArgs,

    /// The data to send. `-` reads it from stdin
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Don't actually run the command, just show what would be run
    #[arg(long)]
    pub dry_run: bool,

    /// Gzip the data sent to NuOrder
    #[arg(long)]
    pub gzip_data: bool,
}

/// Run one parsed command line against `config`.
pub fn run(cli: Cli, config: &IniConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Initiate(args) => initiate(&args, config),
        Commands::Interact(args) => {
            let client = connect(&args.connection, &args.token, config)?;
            let stdin = io::stdin();
            run_session(&client, stdin.lock(), io::stdout(), io::stderr())
        }
        Commands::Get(args) => read(Method::Get, &args, config),
        Commands::Delete(args) => read(Method::Delete, &args, config),
        Commands::Post(args) => write(Method::Post, &args, config),
        Commands::Put(args) => write(Method::Put, &args, config),
    }
}

/// Error text in red, for the terminal.
pub fn failure(err: &dyn Display) -> String {
    format!("\x1b[31m{}\x1b[0m", err)
}

/// Flags win over the config section; an empty flag counts as unset.
pub fn overrides(connection: &ConnectionArgs, token: &TokenArgs) -> Overrides {
    let given = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
    Overrides {
        hostname: given(&connection.hostname),
        consumer_key: given(&connection.consumer_key),
        consumer_secret: given(&connection.consumer_secret),
        oauth_token: given(&token.oauth_token),
        oauth_token_secret: given(&token.oauth_token_secret),
    }
}

fn connect(connection: &ConnectionArgs, token: &TokenArgs, config: &IniConfig) -> anyhow::Result<Client> {
    let credentials = config
        .section(&connection.config_section)
        .credentials(&overrides(connection, token))?;
    Ok(Client::new(credentials)?)
}

fn read(method: Method, args: &ReadArgs, config: &IniConfig) -> anyhow::Result<()> {
    let client = connect(&args.connection, &args.token, config)?;
    let reply = client.signed_request(RequestDescriptor::new(method, &args.endpoint).dry_run(args.dry_run))?;
    print_json(&reply.into_json())
}

fn write(method: Method, args: &WriteArgs, config: &IniConfig) -> anyhow::Result<()> {
    let client = connect(&args.connection, &args.token, config)?;
    let body = match args.data.as_deref() {
        Some(STDIN_MARKER) => {
            let mut bytes = Vec::new();
            io::stdin().lock().read_to_end(&mut bytes)?;
            Some(Payload::from_bytes(bytes)?)
        }
        Some(text) => Some(Payload::from(text)),
        None => None,
    };
    let request = RequestDescriptor::new(method, &args.endpoint)
        .maybe_body(body)
        .gzip_body(args.gzip_data)
        .dry_run(args.dry_run);
    print_json(&client.signed_request(request)?.into_json())
}

fn initiate(args: &InitiateArgs, config: &IniConfig) -> anyhow::Result<()> {
    let profile = config.section(&args.connection.config_section);
    let mut overrides = overrides(&args.connection, &TokenArgs::empty());
    overrides.oauth_token = Some(String::new());
    overrides.oauth_token_secret = Some(String::new());
    let credentials = profile.credentials(&overrides)?;
    let app_name = args.app_name(&profile)?;

    let client = Client::new(credentials.clone())?;
    if args.dry_run {
        let reply = client.signed_request(RequestDescriptor::initiate(app_name).dry_run(true))?;
        eprintln!("Got response: {}", serde_json::to_string_pretty(&reply.into_json())?);
        return Ok(());
    }

    let temporary = client.oauth_initiate(&app_name)?;
    eprintln!("Got response: {}", serde_json::to_string_pretty(&temporary)?);
    eprintln!(
        "Now go to the API management section of NuOrder's admin page \
         and approve the pending application that matches the details above. \
         Copy the verification code that was shown in the pop-up after the \
         approval was made and paste it here."
    );
    eprint!("Verification code [paste and press Enter]: ");
    io::stderr().flush()?;
    let mut verifier = String::new();
    io::stdin().lock().read_line(&mut verifier)?;

    let client = Client::new(credentials.with_token(&temporary))?;
    let token = client.oauth_token_request(verifier.trim())?;
    eprintln!("Success! Final OAuth token and secret to use below. Remember to save them in the INI config.");
    print_json(&serde_json::to_value(&token)?)
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

impl TokenArgs {
    fn empty() -> Self {
        TokenArgs {
            oauth_token: None,
            oauth_token_secret: None,
        }
    }
}
