mod args;
mod drawing;
pub use args::*;
pub use drawing::*;

use paintbots::{
    BotSession, ClientError, Color, FileCache, HttpTransport, RegistrationCache, Transport,
};
use tracing::info;

/// A trait to simplify writing bots.
pub trait Painter {
    /// The name to register when none is given on the command line.
    fn default_name(&self) -> &str;

    fn default_color(&self) -> Color {
        Color::Red
    }

    /// Draws with a registered bot whose color has been set already.
    fn draw<T: Transport, C: RegistrationCache>(
        &mut self,
        bot: &mut BotSession<T, C>,
    ) -> Result<(), ClientError>;

    /// Connects to the server given in `args` and draws.
    fn run(&mut self, args: &BotArgs) -> anyhow::Result<()> {
        let transport = HttpTransport::new(&args.client_config())?;
        let cache = FileCache::new(&args.config_file);
        info!(url = %args.url, "Using paintbots server");
        let mut session = BotSession::new(transport, cache);
        self.run_session(&mut session, args)
    }

    /// Registers, draws and says bye again unless `args.keep` is set.
    ///
    /// The bot also says bye when drawing fails.
    fn run_session<T: Transport, C: RegistrationCache>(
        &mut self,
        session: &mut BotSession<T, C>,
        args: &BotArgs,
    ) -> anyhow::Result<()> {
        let name = args
            .name
            .clone()
            .unwrap_or_else(|| self.default_name().to_string());
        let color = args.color.unwrap_or_else(|| self.default_color());

        let mut bot = session.register_scoped(&name)?;
        bot.set_color(color)?;
        self.draw(&mut *bot)?;

        if let Some(state) = bot.bot_state() {
            info!(bot = %name, position = %state.position, color = %state.color, "Finished drawing");
        }
        if args.keep {
            bot.keep();
        }
        Ok(())
    }
}
