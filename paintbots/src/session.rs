use std::ops::{Deref, DerefMut};

use tracing::{debug, info, warn};

use crate::{
    decode_bots, decode_identity, decode_look, decode_state, BotIdentity, BotState, CacheEntry,
    ClientError, Color, Command, Direction, LookResponse, RegistrationCache, Transport,
};

/// Where a [`BotSession`] is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unregistered,
    Registered {
        identity: BotIdentity,
        /// `None` until the server echoed the bot's state for the first time.
        bot_state: Option<BotState>,
    },
    /// The bot said bye. A new `register` starts a fresh session.
    Deregistered,
}

/// A single bot talking to the server.
///
/// Commands are sent one at a time; every operation takes `&mut self`.
pub struct BotSession<T, C> {
    transport: T,
    cache: C,
    state: SessionState,
}

impl<T: Transport, C: RegistrationCache> BotSession<T, C> {
    pub fn new(transport: T, cache: C) -> Self {
        Self {
            transport,
            cache,
            state: SessionState::Unregistered,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_registered(&self) -> bool {
        matches!(self.state, SessionState::Registered { .. })
    }

    pub fn identity(&self) -> Option<&BotIdentity> {
        match &self.state {
            SessionState::Registered { identity, .. } => Some(identity),
            _ => None,
        }
    }

    /// The state the server echoed last.
    pub fn bot_state(&self) -> Option<&BotState> {
        match &self.state {
            SessionState::Registered { bot_state, .. } => bot_state.as_ref(),
            _ => None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Registers the bot under `name`, reusing a cached registration of the
    /// same name without contacting the server.
    pub fn register(&mut self, name: &str) -> Result<BotIdentity, ClientError> {
        if let Some(identity) = self.identity() {
            return Err(ClientError::AlreadyRegistered {
                name: identity.name.clone(),
            });
        }

        let cached = match self.cache.load() {
            Ok(cached) => cached,
            Err(err) => {
                warn!(%err, "Ignoring unreadable registration cache");
                None
            }
        };

        let identity = match cached {
            Some(entry) if entry.name == name => {
                info!(bot = name, id = %entry.id, "Reusing cached registration");
                entry.into_identity()
            }
            _ => {
                let raw = self
                    .transport
                    .send(&Command::Register(name.to_string()).encode(None))?;
                let identity = BotIdentity {
                    id: decode_identity(&raw)?,
                    name: name.to_string(),
                };
                info!(bot = name, id = %identity.id, "Registered bot");
                if let Err(err) = self.cache.store(&CacheEntry::from(&identity)) {
                    warn!(%err, "Could not persist registration, it will not be reused");
                }
                identity
            }
        };

        self.state = SessionState::Registered {
            identity: identity.clone(),
            bot_state: None,
        };
        Ok(identity)
    }

    /// Like [`register`](Self::register), but the returned guard deregisters
    /// the bot when dropped.
    pub fn register_scoped(&mut self, name: &str) -> Result<ScopedSession<'_, T, C>, ClientError> {
        self.register(name)?;
        Ok(ScopedSession {
            session: self,
            armed: true,
        })
    }

    fn send_registered(&mut self, command: Command) -> Result<String, ClientError> {
        let SessionState::Registered { identity, .. } = &self.state else {
            return Err(ClientError::NotRegistered);
        };
        debug!(bot = %identity.name, ?command, "Sending command");
        let fields = command.encode(Some(&identity.id));
        Ok(self.transport.send(&fields)?)
    }

    fn apply(&mut self, new_state: BotState) -> BotState {
        if let SessionState::Registered { bot_state, .. } = &mut self.state {
            *bot_state = Some(new_state);
        }
        new_state
    }

    fn pixel_command(&mut self, command: Command) -> Result<BotState, ClientError> {
        let raw = self.send_registered(command)?;
        let new_state = decode_state(&raw)?;
        debug!(position = %new_state.position, color = %new_state.color, "Server echo");
        Ok(self.apply(new_state))
    }

    /// Moves the bot by one pixel.
    pub fn move_bot(&mut self, direction: Direction) -> Result<BotState, ClientError> {
        self.pixel_command(Command::Move(direction))
    }

    /// Paints the pixel under the bot with the bot's color.
    pub fn paint(&mut self) -> Result<BotState, ClientError> {
        self.pixel_command(Command::Paint)
    }

    /// Chooses the color for subsequent `paint` commands.
    pub fn set_color(&mut self, color: Color) -> Result<BotState, ClientError> {
        self.pixel_command(Command::Color(color))
    }

    pub fn clear(&mut self) -> Result<BotState, ClientError> {
        self.pixel_command(Command::Clear)
    }

    pub fn say(&mut self, message: &str) -> Result<BotState, ClientError> {
        self.pixel_command(Command::Say(message.to_string()))
    }

    /// A pixel answer updates the bot's state, a canvas dump does not.
    pub fn look(&mut self) -> Result<LookResponse, ClientError> {
        let raw = self.send_registered(Command::Look)?;
        let response = decode_look(&raw)?;
        if let LookResponse::Pixel(new_state) = &response {
            self.apply(*new_state);
        }
        Ok(response)
    }

    /// Information about all bots on the server.
    pub fn list_bots(&mut self) -> Result<serde_json::Value, ClientError> {
        let raw = self.send_registered(Command::ListBots)?;
        Ok(decode_bots(&raw)?)
    }

    /// Removes the bot from the server and forgets the cached registration.
    ///
    /// Calling this again afterwards does nothing. If the request fails the
    /// bot stays registered.
    pub fn deregister(&mut self) -> Result<(), ClientError> {
        match &self.state {
            SessionState::Deregistered => return Ok(()),
            SessionState::Unregistered => return Err(ClientError::NotRegistered),
            SessionState::Registered { .. } => {}
        }
        self.send_registered(Command::Deregister)?;
        if let Err(err) = self.cache.clear() {
            warn!(%err, "Could not clear the registration cache");
        }
        if let Some(identity) = self.identity() {
            info!(bot = %identity.name, "Deregistered bot");
        }
        self.state = SessionState::Deregistered;
        Ok(())
    }
}

/// A registered session that says bye when it goes out of scope.
///
/// Created by [`BotSession::register_scoped`]. Failures while deregistering
/// are logged and otherwise ignored.
pub struct ScopedSession<'a, T: Transport, C: RegistrationCache> {
    session: &'a mut BotSession<T, C>,
    armed: bool,
}

impl<T: Transport, C: RegistrationCache> ScopedSession<'_, T, C> {
    /// Leaves the bot registered, so its cached identity is reused next time.
    pub fn keep(mut self) {
        self.armed = false;
    }
}

impl<T: Transport, C: RegistrationCache> Deref for ScopedSession<'_, T, C> {
    type Target = BotSession<T, C>;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl<T: Transport, C: RegistrationCache> DerefMut for ScopedSession<'_, T, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl<T: Transport, C: RegistrationCache> Drop for ScopedSession<'_, T, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = self.session.deregister() {
            warn!(%err, "Could not deregister bot");
        }
    }
}
