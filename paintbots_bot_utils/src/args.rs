use std::path::PathBuf;
use std::time::Duration;

use paintbots::{ClientConfig, Color, DEFAULT_CACHE_FILE, DEFAULT_URL};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

/// Command line options shared by all bots.
#[derive(clap::Args, Clone, Debug)]
pub struct BotArgs {
    /// URL of the paintbots server
    #[arg(long, env = "PAINTBOTS_URL", default_value = DEFAULT_URL)]
    pub url: Url,

    /// Name to register. Must be unique on the canvas
    #[arg(short, long, env = "PAINTBOTS_NAME")]
    pub name: Option<String>,

    /// Color to paint with, as a palette symbol (0-9, a-f) or a name like "red"
    #[arg(short, long)]
    pub color: Option<Color>,

    /// Where the id of the registered bot is kept between runs
    #[arg(long, env = "PAINTBOTS_CONFIG_FILE", default_value = DEFAULT_CACHE_FILE)]
    pub config_file: PathBuf,

    /// Timeout for a single request, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Stay registered on exit, so that the next run reuses the bot.
    ///
    /// Without it the bot says bye and the config file is cleared when the
    /// run ends, so every run registers a fresh bot and leaves no stale
    /// bot on the canvas
    #[arg(short, long, default_value_t = false)]
    pub keep: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl BotArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Logs go to stderr, stdout is left to the bot.
pub fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
