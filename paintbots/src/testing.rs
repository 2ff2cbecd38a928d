//! An in-process stand-in for the paintbots server.

use std::collections::{BTreeMap, HashMap};

use serde_json::json;

use crate::{Color, Direction, FormFields, Position, Transport, TransportError};

/// Canvas size of the fake server.
pub const WIDTH: i32 = 160;
pub const HEIGHT: i32 = 100;

/// What the fake server answers to `look`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookMode {
    Pixel,
    Canvas,
}

#[derive(Clone, Debug)]
struct FakeBot {
    name: String,
    position: Position,
    color: Color,
    message: Option<String>,
}

/// Implements the server side of the protocol in memory and records every
/// request it receives.
#[derive(Debug)]
pub struct FakeServer {
    bots: HashMap<String, FakeBot>,
    pixels: BTreeMap<(i32, i32), Color>,
    next_id: usize,
    start: Position,
    look_mode: LookMode,
    fail_next: Option<u16>,
    requests: Vec<FormFields>,
}

impl Default for FakeServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeServer {
    pub fn new() -> Self {
        Self::starting_at(Position {
            x: WIDTH / 2,
            y: HEIGHT / 2,
        })
    }

    /// Newly registered bots are placed at `start`.
    pub fn starting_at(start: Position) -> Self {
        Self {
            bots: HashMap::new(),
            pixels: BTreeMap::new(),
            next_id: 1,
            start,
            look_mode: LookMode::Pixel,
            fail_next: None,
            requests: Vec::new(),
        }
    }

    pub fn with_look_mode(mut self, look_mode: LookMode) -> Self {
        self.look_mode = look_mode;
        self
    }

    /// Answer the next request with this HTTP status instead.
    pub fn fail_next(&mut self, status: u16) {
        self.fail_next = Some(status);
    }

    /// All requests received so far.
    pub fn requests(&self) -> &[FormFields] {
        &self.requests
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// How many requests contained the verb field `verb`.
    pub fn count_verb(&self, verb: &str) -> usize {
        self.requests
            .iter()
            .filter(|fields| fields.iter().any(|(key, _)| *key == verb))
            .count()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.bots.contains_key(id)
    }

    pub fn painted(&self, x: i32, y: i32) -> Option<Color> {
        self.pixels.get(&(x, y)).copied()
    }

    pub fn painted_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn message_of(&self, id: &str) -> Option<&str> {
        self.bots.get(id).and_then(|bot| bot.message.as_deref())
    }

    fn echo(bot: &FakeBot) -> String {
        format!(
            "x={}&y={}&color={}",
            bot.position.x, bot.position.y, bot.color
        )
    }

    fn canvas(&self) -> String {
        let mut canvas = String::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                canvas.push(self.painted(x, y).map_or('.', |color| color.symbol()));
            }
            canvas.push('\n');
        }
        canvas
    }

    fn bad_request(body: &str) -> TransportError {
        TransportError::Status {
            status: 400,
            body: body.to_string(),
        }
    }

    fn handle(&mut self, fields: &FormFields) -> Result<String, TransportError> {
        let lookup = |key: &str| {
            fields
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| value.clone())
        };

        if let Some(name) = lookup("register") {
            if self.bots.values().any(|bot| bot.name == name) {
                return Err(Self::bad_request("Name already in use"));
            }
            let id = format!("bot-{:04}", self.next_id);
            self.next_id += 1;
            self.bots.insert(
                id.clone(),
                FakeBot {
                    name,
                    position: self.start,
                    color: Color::Black,
                    message: None,
                },
            );
            return Ok(id);
        }

        let id = lookup("id").ok_or_else(|| Self::bad_request("Missing id"))?;
        if lookup("bots").is_some() {
            let listing: Vec<_> = self
                .bots
                .values()
                .map(|bot| {
                    json!({
                        "name": bot.name,
                        "x": bot.position.x,
                        "y": bot.position.y,
                        "color": bot.color,
                        "msg": bot.message,
                    })
                })
                .collect();
            return Ok(serde_json::Value::Array(listing).to_string());
        }
        if lookup("look").is_some() && self.look_mode == LookMode::Canvas {
            return Ok(self.canvas());
        }

        let bot = self
            .bots
            .get_mut(&id)
            .ok_or_else(|| Self::bad_request("Unknown bot id"))?;
        if let Some(direction) = lookup("move") {
            let direction = direction
                .parse::<Direction>()
                .map_err(|err| Self::bad_request(&err))?;
            let Position { x, y } = bot.position;
            let (x, y) = match direction {
                Direction::Left => (x - 1, y),
                Direction::Right => (x + 1, y),
                Direction::Up => (x, y - 1),
                Direction::Down => (x, y + 1),
            };
            bot.position = Position {
                x: x.clamp(0, WIDTH - 1),
                y: y.clamp(0, HEIGHT - 1),
            };
        } else if lookup("paint").is_some() {
            let (position, color) = (bot.position, bot.color);
            self.pixels.insert((position.x, position.y), color);
        } else if lookup("clear").is_some() {
            let position = bot.position;
            self.pixels.remove(&(position.x, position.y));
        } else if let Some(symbol) = lookup("color") {
            bot.color = symbol
                .parse::<Color>()
                .map_err(|err| Self::bad_request(&err.to_string()))?;
        } else if let Some(message) = lookup("msg") {
            bot.message = Some(message);
        } else if lookup("bye").is_some() {
            self.bots.remove(&id);
            return Ok(String::new());
        } else if lookup("look").is_none() {
            return Err(Self::bad_request("Unknown command"));
        }

        Ok(Self::echo(bot))
    }
}

impl Transport for FakeServer {
    fn send(&mut self, fields: &FormFields) -> Result<String, TransportError> {
        self.requests.push(fields.clone());
        if let Some(status) = self.fail_next.take() {
            return Err(TransportError::Status {
                status,
                body: String::from("Injected failure"),
            });
        }
        self.handle(fields)
    }
}
