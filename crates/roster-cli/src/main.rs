//! `roster`: manage the intern and team rosters from the terminal.
//!
//! # Usage
//!
//! ```text
//! roster login --email admin@leafclutch.com
//! roster --type teams list --search design
//! roster add --name "Aman Gupta" --position "Backend Intern" --email aman@leafclutch.com
//! roster toggle 7f1c…
//! roster            # interactive browser
//! roster --demo     # browse built-in sample data, no server needed
//! ```

mod app;
mod backend;
mod commands;
mod render;
mod token;
mod ui;

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
  time::Duration,
};

use anyhow::{Context, Result, bail};
use app::App;
use backend::Backend;
use clap::{Parser, Subcommand};
use commands::{FieldArgs, Runner};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use roster_client::{ClientConfig, HttpGateway};
use roster_core::{
  EntityKind, form::DeletePrompt, memory::MemoryDirectory, session::Session,
};
use roster_store::CollectionStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:8000";
const DEFAULT_TOKEN_FILE: &str = "~/.config/roster/token";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Manage interns and team members")]
struct Args {
  /// Path to a TOML config file (url, token_file).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the roster API (default: http://localhost:8000).
  #[arg(long, env = "ROSTER_URL")]
  url: Option<String>,

  /// Where the bearer token is kept between runs.
  #[arg(long, env = "ROSTER_TOKEN_FILE", value_name = "FILE")]
  token_file: Option<PathBuf>,

  /// Collection to work on: interns or teams.
  #[arg(long = "type", value_name = "TYPE", default_value = "interns", global = true)]
  kind: EntityKind,

  /// Work on built-in sample data instead of the API.
  #[arg(long, global = true)]
  demo: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Sign in as the admin and save the token.
  Login {
    #[arg(long)]
    email:    String,
    /// Read from stdin when omitted.
    #[arg(long, env = "ROSTER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
  },
  /// Forget the saved token.
  Logout,
  /// Print one page of the collection.
  List {
    /// Case-insensitive match on name, position or email.
    #[arg(short, long)]
    search: Option<String>,
    #[arg(short, long, default_value_t = 1)]
    page:   usize,
  },
  /// Add a member.
  Add(FieldArgs),
  /// Change fields of an existing member.
  Edit {
    id:     Uuid,
    #[command(flatten)]
    fields: FieldArgs,
  },
  /// Remove a member after confirmation.
  Delete {
    id:  Uuid,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
  },
  /// Show or hide a member on the public website.
  Toggle { id: Uuid },
  /// Interactive browser (the default).
  Browse,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:        String,
  #[serde(default)]
  token_file: String,
}

struct Settings {
  base_url:   String,
  token_file: PathBuf,
}

fn settings(args: &Args) -> Result<Settings> {
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .clone()
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_owned());
  let token_file = args
    .token_file
    .clone()
    .or_else(|| (!file_cfg.token_file.is_empty()).then(|| PathBuf::from(&file_cfg.token_file)))
    .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));

  Ok(Settings { base_url, token_file: token::expand_tilde(&token_file) })
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let mut args = Args::parse();
  let command = args.command.take().unwrap_or(Command::Browse);

  // The browser owns the terminal; everything else logs to stderr.
  if !matches!(command, Command::Browse) {
    tracing_subscriber::fmt()
      .with_writer(io::stderr)
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::WARN.into())
          .from_env_lossy(),
      )
      .init();
  }

  let settings = settings(&args)?;

  match command {
    Command::Login { email, password } => {
      return login(&args, &settings, &email, password).await;
    }
    Command::Logout => {
      token::remove(&settings.token_file)?;
      println!("Signed out.");
      return Ok(());
    }
    _ => {}
  }

  let (backend, session) = connect(&args, &settings)?;
  let (store, notices) =
    CollectionStore::with_session(backend, args.kind, session.watch());

  let result = if matches!(command, Command::Browse) {
    let mut app = App::new(store, notices, args.kind, Some(session.watch()));
    browse(&mut app).await
  } else {
    let mut runner = Runner::new(store, notices, args.kind);
    run(&mut runner, command).await.map(|text| print!("{text}"))
  };

  if !session.is_active() {
    // The server turned the token down: drop it and send the user to login.
    token::remove(&settings.token_file)?;
    bail!("Your session has expired. Run `roster login --email <EMAIL>` to sign in again.");
  }
  result
}

/// Pick the backend and the session guarding it.
fn connect(args: &Args, settings: &Settings) -> Result<(Backend, Session)> {
  if args.demo {
    let session = Session::new(Some("demo".to_owned()));
    return Ok((Backend::Demo(MemoryDirectory::with_demo_data()), session));
  }

  let Some(token) = token::read(&settings.token_file)? else {
    bail!("Not signed in. Run `roster login --email <EMAIL>` first.");
  };
  let session = Session::new(Some(token));
  let config = ClientConfig { base_url: settings.base_url.clone(), ..ClientConfig::default() };
  let gateway = HttpGateway::new(config, session.clone()).context("creating HTTP client")?;
  Ok((Backend::Http(gateway), session))
}

async fn login(
  args: &Args,
  settings: &Settings,
  email: &str,
  password: Option<String>,
) -> Result<()> {
  if args.demo {
    bail!("--demo needs no login");
  }
  let password = match password {
    Some(p) => p,
    None => read_line("Password: ")?,
  };

  let config = ClientConfig { base_url: settings.base_url.clone(), ..ClientConfig::default() };
  let gateway = HttpGateway::new(config, Session::default()).context("creating HTTP client")?;
  let token = match gateway.login(email, &password).await {
    Ok(token) => token,
    Err(roster_client::Error::InvalidCredentials) => bail!("Invalid email or password."),
    Err(e) => return Err(e).context("signing in"),
  };

  token::write(&settings.token_file, &token.access_token)?;
  println!("Signed in as {email}.");
  Ok(())
}

async fn run(runner: &mut Runner<Backend>, command: Command) -> Result<String> {
  match command {
    Command::List { search, page } => runner.list(search, page).await,
    Command::Add(fields) => runner.add(fields).await,
    Command::Edit { id, fields } => runner.edit(id, fields).await,
    Command::Delete { id, yes } => {
      runner.delete(id, |prompt| if yes { Ok(true) } else { ask(prompt) }).await
    }
    Command::Toggle { id } => runner.toggle(id).await,
    Command::Login { .. } | Command::Logout | Command::Browse => {
      bail!("this command does not operate on a collection")
    }
  }
}

fn ask(prompt: &DeletePrompt) -> Result<bool> {
  let answer = read_line(&format!("{} [y/N] ", prompt.question()))?;
  Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Print `prompt` and read one line from stdin.
fn read_line(prompt: &str) -> Result<String> {
  print!("{prompt}");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_owned())
}

// ─── Interactive browser ──────────────────────────────────────────────────────

async fn browse(app: &mut App<Backend>) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Placeholder for the first frame; `refresh` takes over after the load.
  app.loading = true;
  let first_frame = terminal.draw(|f| ui::draw(f, app)).map(drop);
  let run_result = match first_frame.context("drawing frame") {
    Ok(()) => {
      app.load().await;
      run_event_loop(&mut terminal, app).await
    }
    Err(e) => Err(e),
  };
  app.settle().await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<Backend>,
) -> Result<()> {
  loop {
    app.refresh().await;
    if app.signed_out() {
      break;
    }
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }
  }
  Ok(())
}
