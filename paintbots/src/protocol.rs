//! The wire format of the paintbots server.
//!
//! Every request is a single form-encoded POST. Commands other than
//! `register` carry the bot's `id` next to exactly one verb field. Most
//! commands are answered by echoing the bot's pixel state as a query string
//! (`x=3&y=4&color=8`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Color, ParseError};

/// The form fields of one request, in order.
pub type FormFields = Vec<(&'static str, String)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }

    /// The direction after a quarter turn clockwise.
    pub fn turn_right(self) -> Direction {
        match self {
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
        }
    }

    /// The direction after a quarter turn counterclockwise.
    pub fn turn_left(self) -> Direction {
        match self {
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("'{}' is not one of LEFT, RIGHT, UP, DOWN", s))
    }
}

/// The opaque token the server hands out on registration.
///
/// It is only ever echoed back to the server, never inspected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(String);

impl BotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BotId {
    fn from(token: String) -> Self {
        BotId(token)
    }
}

impl std::fmt::Display for BotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub id: BotId,
    pub name: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The state of a bot as echoed by the server.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotState {
    pub position: Position,
    /// The color the bot currently paints with.
    pub color: Color,
}

/// A command for the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Register a new bot under this name.
    ///
    /// Answered by the bare id of the new bot.
    Register(String),
    Move(Direction),
    /// Paint the pixel under the bot with its current color.
    Paint,
    Color(Color),
    /// Clear the pixel under the bot.
    Clear,
    /// Answered by either the pixel state or an ASCII dump of the canvas.
    Look,
    /// Show a message next to the bot.
    Say(String),
    /// Answered by a JSON listing of all bots.
    ListBots,
    /// Remove the bot from the server.
    Deregister,
}

impl Command {
    /// The verb field and its value.
    pub fn verb(&self) -> (&'static str, String) {
        match self {
            Command::Register(name) => ("register", name.clone()),
            Command::Move(direction) => ("move", direction.as_str().to_string()),
            Command::Paint => ("paint", String::from("1")),
            Command::Color(color) => ("color", color.symbol().to_string()),
            Command::Clear => ("clear", String::from("1")),
            Command::Look => ("look", String::from("1")),
            Command::Say(message) => ("msg", message.clone()),
            Command::ListBots => ("bots", String::from("1")),
            Command::Deregister => ("bye", String::from("1")),
        }
    }

    pub fn needs_id(&self) -> bool {
        !matches!(self, Command::Register(_))
    }

    /// The form fields for this command sent on behalf of the bot `id`.
    ///
    /// `id` is ignored for [`Command::Register`].
    pub fn encode(&self, id: Option<&BotId>) -> FormFields {
        let mut fields = Vec::with_capacity(2);
        if let (true, Some(id)) = (self.needs_id(), id) {
            fields.push(("id", id.as_str().to_string()));
        }
        fields.push(self.verb());
        fields
    }
}

/// The answer to a [`Command::Look`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookResponse {
    Pixel(BotState),
    /// ASCII representation of the whole canvas.
    Canvas(String),
}

const PIXEL_FIELDS: [&str; 3] = ["x", "y", "color"];

fn query_pairs(raw: &str) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(raw.trim().as_bytes()) {
        // The first occurrence wins, like URLSearchParams.get()
        pairs
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    pairs
}

fn coordinate(pairs: &HashMap<String, String>, field: &'static str) -> Result<i32, ParseError> {
    let value = pairs.get(field).ok_or(ParseError::MissingField(field))?;
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidCoordinate {
            field,
            value: value.clone(),
        })
}

fn state_from_pairs(pairs: &HashMap<String, String>) -> Result<BotState, ParseError> {
    let x = coordinate(pairs, "x")?;
    let y = coordinate(pairs, "y")?;
    let color = pairs.get("color").ok_or(ParseError::MissingField("color"))?;
    let mut chars = color.trim().chars();
    let color = match (chars.next(), chars.next()) {
        (Some(symbol), None) => Color::from_symbol(symbol),
        _ => None,
    }
    .ok_or_else(|| ParseError::InvalidColor(color.clone()))?;
    Ok(BotState {
        position: Position { x, y },
        color,
    })
}

/// Decodes the pixel state echoed after most commands.
///
/// All of `x`, `y` and `color` must be present and valid. A partial answer is
/// an error, never a partial update.
pub fn decode_state(raw: &str) -> Result<BotState, ParseError> {
    state_from_pairs(&query_pairs(raw))
}

/// Decodes the answer to [`Command::Register`], which is the bare id.
pub fn decode_identity(raw: &str) -> Result<BotId, ParseError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ParseError::EmptyIdentity);
    }
    Ok(BotId(token.to_string()))
}

/// Decodes the answer to [`Command::Look`].
///
/// A body that carries any pixel field is decoded strictly as a pixel state,
/// anything else is taken to be a canvas dump.
pub fn decode_look(raw: &str) -> Result<LookResponse, ParseError> {
    let pairs = query_pairs(raw);
    if PIXEL_FIELDS.iter().any(|field| pairs.contains_key(*field)) {
        state_from_pairs(&pairs).map(LookResponse::Pixel)
    } else {
        Ok(LookResponse::Canvas(raw.to_string()))
    }
}

/// Decodes the answer to [`Command::ListBots`].
pub fn decode_bots(raw: &str) -> Result<serde_json::Value, ParseError> {
    serde_json::from_str(raw).map_err(|err| ParseError::InvalidBotsListing(err.to_string()))
}
