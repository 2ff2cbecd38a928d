use clap::Parser;
use paintbots::{BotSession, ClientError, Color, Direction, RegistrationCache, Transport};
use paintbots_bot_utils::{initialize_logging, line, BotArgs, Painter};
use tracing::debug;

#[derive(Parser)]
struct Args {
    #[command(flatten)]
    bot: BotArgs,

    /// Length of the outermost wall
    #[arg(short, long, default_value_t = 10)]
    size: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.bot.log_level);
    MazeBot { size: args.size }.run(&args.bot)
}

/// Draws a square spiral inwards, every wall one pixel shorter than the last.
struct MazeBot {
    size: usize,
}

impl Painter for MazeBot {
    fn default_name(&self) -> &str {
        "Mazer"
    }

    fn default_color(&self) -> Color {
        Color::LightBlue
    }

    fn draw<T: Transport, C: RegistrationCache>(
        &mut self,
        bot: &mut BotSession<T, C>,
    ) -> Result<(), ClientError> {
        let mut direction = Direction::Left;
        for length in (1..=self.size).rev() {
            debug!(%direction, length, "Drawing wall");
            line(bot, direction, length)?;
            // Left, down, right, up
            direction = direction.turn_left();
        }
        Ok(())
    }
}
