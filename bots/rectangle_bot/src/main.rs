use clap::Parser;
use paintbots::{BotSession, ClientError, Direction, RegistrationCache, Transport};
use paintbots_bot_utils::{initialize_logging, move_by, rectangle, BotArgs, Painter};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Parser)]
struct Args {
    #[command(flatten)]
    bot: BotArgs,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.bot.log_level);
    let seed = args.seed.unwrap_or_else(rand::random);
    let rng = StdRng::seed_from_u64(seed);

    RectangleBot { rng }.run(&args.bot)
}

const SAYINGS: [&str; 8] = [
    "Kylän kohoralla komiasti, vaikka mettällä vähän kompuroottooki.",
    "Kyllä maailma opettaa, jonsei muuta niin hilijaa kävelemähän.",
    "Olokaa klopit hilijaa siälä porstuas, nyt tuloo runua!",
    "Hyviä neuvoja sateloo niinku rakehia.",
    "Minen palijo mitää tee, jos mä jotaki teen, niin mä makaan.",
    "Nii on jano, notta sylyki pöläjää. 🍺",
    "Kyllä aika piisaa, kun vain järki kestää.",
    "Me ei teherä virheitä, vaa ilosii pikku vahinkoi.",
];

/// (width of the square, gap to the next square)
const SQUARES: [(usize, usize); 4] = [(6, 3), (3, 6), (6, 3), (3, 8)];

/// Says something random, then draws a row of squares.
struct RectangleBot {
    rng: StdRng,
}

impl Painter for RectangleBot {
    fn default_name(&self) -> &str {
        "MyBot"
    }

    fn draw<T: Transport, C: RegistrationCache>(
        &mut self,
        bot: &mut BotSession<T, C>,
    ) -> Result<(), ClientError> {
        if let Some(saying) = SAYINGS.choose(&mut self.rng) {
            bot.say(saying)?;
        }
        for (width, gap) in SQUARES {
            rectangle(bot, width)?;
            move_by(bot, Direction::Right, gap)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use paintbots::testing::FakeServer;
    use paintbots::{MemoryCache, Position};

    use super::*;

    #[test]
    fn draws_a_row_of_squares() {
        let mut bot = BotSession::new(
            FakeServer::starting_at(Position { x: 0, y: 0 }),
            MemoryCache::new(),
        );
        let id = bot.register("MyBot").unwrap().id;
        RectangleBot {
            rng: StdRng::seed_from_u64(7),
        }
        .draw(&mut bot)
        .unwrap();

        let server = bot.transport();
        assert!(server.message_of(id.as_str()).is_some());
        // The small squares share two sides with the big ones before them
        assert_eq!(server.painted_count(), 20 + 3 + 20 + 3);
        assert!(server.painted(4, 2).is_some());
        assert!(server.painted(4, 1).is_none());
        assert!(server.painted(7, 0).is_none());
        assert!(server.painted(9, 5).is_some());
        assert_eq!(bot.bot_state().unwrap().position, Position { x: 20, y: 0 });
    }
}
