use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use paintbots::{
    BotSession, BotState, ClientConfig, Color, Direction, FileCache, HttpTransport, LookResponse,
    RegistrationCache, Transport, DEFAULT_CACHE_FILE, DEFAULT_URL,
};
use paintbots_bot_utils::initialize_logging;
use tracing::{debug, warn};
use tracing::level_filters::LevelFilter;
use url::Url;

#[derive(Parser)]
/// Sends single commands to a paintbots server.
///
/// The bot's id is kept in the config file, so consecutive invocations
/// control the same bot until `bye` is sent.
struct Args {
    /// URL of the paintbots server
    #[arg(long, env = "PAINTBOTS_URL", default_value = DEFAULT_URL)]
    url: Url,

    /// Name of the bot. Defaults to the bot in the config file
    #[arg(short, long, env = "PAINTBOTS_NAME")]
    name: Option<String>,

    /// Where the id of the registered bot is kept between runs
    #[arg(long, env = "PAINTBOTS_CONFIG_FILE", default_value = DEFAULT_CACHE_FILE)]
    config_file: PathBuf,

    /// Timeout for a single request, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
enum CliCommand {
    /// Register the bot (or reuse its cached registration) and print its id
    Register,
    /// Move the bot, one pixel per step
    Move {
        direction: Direction,
        #[arg(default_value_t = 1)]
        steps: usize,
    },
    /// Paint the pixel under the bot
    Paint,
    /// Set the color to paint with
    Color { color: Color },
    /// Clear the pixel under the bot
    Clear,
    /// Print the bot's state or the canvas
    Look,
    /// Show a message next to the bot
    Say { message: String },
    /// Print all bots as JSON
    Bots,
    /// Remove the bot from the server and forget its id
    Bye,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let config = ClientConfig {
        url: args.url.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    };
    let cache = FileCache::new(&args.config_file);
    let name = match args.name {
        Some(name) => name,
        None => cached_name(&cache)
            .ok_or_else(|| anyhow::anyhow!("No bot registered yet, pass --name"))?,
    };

    let mut session = BotSession::new(HttpTransport::new(&config)?, cache);
    let output = execute(&mut session, &name, &args.command)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// The name of the bot in the config file. An unreadable file counts as empty.
fn cached_name<C: RegistrationCache>(cache: &C) -> Option<String> {
    match cache.load() {
        Ok(entry) => entry.map(|entry| entry.name),
        Err(err) => {
            warn!(%err, "Ignoring unreadable registration cache");
            None
        }
    }
}

fn describe(state: &BotState) -> String {
    format!(
        "x={} y={} color={} ({})",
        state.position.x,
        state.position.y,
        state.color,
        state.color.name()
    )
}

/// Runs one command for the bot `name` and returns what should be printed.
fn execute<T: Transport, C: RegistrationCache>(
    session: &mut BotSession<T, C>,
    name: &str,
    command: &CliCommand,
) -> anyhow::Result<String> {
    // Only the bot from the config file can say bye
    if matches!(command, CliCommand::Bye)
        && cached_name(session.cache()).as_deref() != Some(name)
    {
        anyhow::bail!("No registered bot named '{}'", name);
    }
    let identity = session.register(name)?;
    debug!(bot = name, id = %identity.id, ?command, "Executing");

    let output = match command {
        CliCommand::Register => identity.id.to_string(),
        CliCommand::Move { direction, steps } => {
            let mut last = None;
            for _ in 0..*steps {
                last = Some(session.move_bot(*direction)?);
            }
            last.as_ref().map(describe).unwrap_or_default()
        }
        CliCommand::Paint => describe(&session.paint()?),
        CliCommand::Color { color } => describe(&session.set_color(*color)?),
        CliCommand::Clear => describe(&session.clear()?),
        CliCommand::Look => match session.look()? {
            LookResponse::Pixel(state) => describe(&state),
            LookResponse::Canvas(canvas) => canvas.trim_end().to_string(),
        },
        CliCommand::Say { message } => describe(&session.say(message)?),
        CliCommand::Bots => serde_json::to_string_pretty(&session.list_bots()?)?,
        CliCommand::Bye => {
            session.deregister()?;
            String::new()
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use paintbots::testing::FakeServer;
    use std::fs;

    use paintbots::{CacheEntry, MemoryCache, Position};

    use super::*;

    #[test]
    fn parses_commands() {
        let args = Args::try_parse_from(["paintbots", "-n", "Mazer", "move", "left", "3"]).unwrap();
        assert_eq!(
            args.command,
            CliCommand::Move {
                direction: Direction::Left,
                steps: 3
            }
        );
        let args = Args::try_parse_from(["paintbots", "color", "red"]).unwrap();
        assert_eq!(args.command, CliCommand::Color { color: Color::Red });
        assert!(Args::try_parse_from(["paintbots", "move", "sideways"]).is_err());
    }

    #[test]
    fn consecutive_invocations_share_the_bot() {
        let mut server = FakeServer::starting_at(Position { x: 5, y: 5 });
        let mut cache = MemoryCache::new();

        let id = execute(
            &mut BotSession::new(&mut server, &mut cache),
            "Mazer",
            &CliCommand::Register,
        )
        .unwrap();
        let output = execute(
            &mut BotSession::new(&mut server, &mut cache),
            "Mazer",
            &CliCommand::Move {
                direction: Direction::Right,
                steps: 2,
            },
        )
        .unwrap();
        assert_eq!(output, "x=7 y=5 color=0 (black)");
        assert_eq!(server.count_verb("register"), 1);
        assert_eq!(cache.entry(), Some(&CacheEntry::new("Mazer", id)));

        let output = execute(
            &mut BotSession::new(&mut server, &mut cache),
            "Mazer",
            &CliCommand::Bye,
        )
        .unwrap();
        assert!(output.is_empty());
        assert_eq!(cache.entry(), None);
    }

    #[test]
    fn bye_without_cached_bot_sends_nothing() {
        let mut server = FakeServer::new();
        let result = execute(
            &mut BotSession::new(&mut server, MemoryCache::new()),
            "Ghost",
            &CliCommand::Bye,
        );
        assert!(result.is_err());

        let cache = MemoryCache::with_entry(CacheEntry::new("Mazer", "bot-0042"));
        let result = execute(
            &mut BotSession::new(&mut server, cache),
            "Ghost",
            &CliCommand::Bye,
        );
        assert!(result.is_err());
        assert_eq!(server.count_verb("register"), 0);
        assert_eq!(server.request_count(), 0);
    }

    #[test]
    fn corrupt_config_file_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CACHE_FILE);
        fs::write(&path, "no separator here").unwrap();
        assert_eq!(cached_name(&FileCache::new(&path)), None);

        fs::write(&path, "Mazer:bot-0001").unwrap();
        assert_eq!(cached_name(&FileCache::new(&path)).as_deref(), Some("Mazer"));
        assert_eq!(cached_name(&FileCache::new(dir.path().join("missing.cfg"))), None);
    }
}
