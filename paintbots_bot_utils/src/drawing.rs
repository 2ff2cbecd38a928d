use paintbots::{BotSession, ClientError, Direction, RegistrationCache, Transport};

/// The sides of a rectangle, clockwise from the top left corner.
pub const CLOCKWISE: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

/// Moves `dist` pixels without painting.
pub fn move_by<T: Transport, C: RegistrationCache>(
    bot: &mut BotSession<T, C>,
    direction: Direction,
    dist: usize,
) -> Result<(), ClientError> {
    for _ in 0..dist {
        bot.move_bot(direction)?;
    }
    Ok(())
}

/// Paints the current pixel, then moves on, `count` times.
///
/// The bot ends up on the first unpainted pixel after the line.
pub fn line<T: Transport, C: RegistrationCache>(
    bot: &mut BotSession<T, C>,
    direction: Direction,
    count: usize,
) -> Result<(), ClientError> {
    for _ in 0..count {
        bot.paint()?;
        bot.move_bot(direction)?;
    }
    Ok(())
}

/// Draws the outline of a `width` x `width` square whose top left corner is
/// the current position. The bot ends up where it started.
pub fn rectangle<T: Transport, C: RegistrationCache>(
    bot: &mut BotSession<T, C>,
    width: usize,
) -> Result<(), ClientError> {
    for direction in CLOCKWISE {
        for _ in 1..width {
            bot.move_bot(direction)?;
            bot.paint()?;
        }
    }
    Ok(())
}
