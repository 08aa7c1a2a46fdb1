//! Command line parsing.

use heapless::String;

use crate::config::ParseMode;
use crate::error::CommandError;

const SET_SPEED: &str = "SET_SPEED";
const JOGSPEED: &str = "JOGSPEED";

/// A parsed host command.
///
/// Numeric arguments are `None` when a permissive parse found no usable
/// number; the controller then keeps the value it already has.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `SET_SPEED <steps/s>`
    SetSpeed(Option<f32>),
    /// `START`
    Start,
    /// `STOP`
    Stop,
    /// `JOG_FORWARD`
    JogForward,
    /// `JOG_BACKWARD`
    JogBackward,
    /// `STOP_JOG`
    StopJog,
    /// `HOME`
    Home,
    /// `ESTOP`
    EStop,
    /// `ENABLE`
    Enable,
    /// `DISABLE`
    Disable,
    /// `SETPOS_0`
    ResetPositionToZero,
    /// `JOGSPEED <rev/s>`
    SetJogSpeed(Option<f32>),
    /// Anything else (permissive mode only).
    Unrecognized(String<64>),
}

impl Command {
    /// Protocol verb of this command.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::SetSpeed(_) => SET_SPEED,
            Command::Start => "START",
            Command::Stop => "STOP",
            Command::JogForward => "JOG_FORWARD",
            Command::JogBackward => "JOG_BACKWARD",
            Command::StopJog => "STOP_JOG",
            Command::Home => "HOME",
            Command::EStop => "ESTOP",
            Command::Enable => "ENABLE",
            Command::Disable => "DISABLE",
            Command::ResetPositionToZero => "SETPOS_0",
            Command::SetJogSpeed(_) => JOGSPEED,
            Command::Unrecognized(_) => "?",
        }
    }

    fn from_verb(verb: &str) -> Option<Self> {
        let cmd = match verb {
            "START" => Command::Start,
            "STOP" => Command::Stop,
            "JOG_FORWARD" => Command::JogForward,
            "JOG_BACKWARD" => Command::JogBackward,
            "STOP_JOG" => Command::StopJog,
            "HOME" => Command::Home,
            "ESTOP" => Command::EStop,
            "ENABLE" => Command::Enable,
            "DISABLE" => Command::Disable,
            "SETPOS_0" => Command::ResetPositionToZero,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Parse one command line.
///
/// Surrounding whitespace (including `\r`) is ignored and verbs are
/// case-sensitive. Argument-less verbs must be the whole line; `SET_SPEED`
/// and `JOGSPEED` are matched as prefixes.
pub fn parse_command(line: &str, mode: ParseMode) -> Result<Command, CommandError> {
    let line = line.trim();

    if let Some(cmd) = Command::from_verb(line) {
        return Ok(cmd);
    }

    if let Some(rest) = line.strip_prefix(SET_SPEED) {
        return parse_argument(rest, mode, SET_SPEED, false).map(Command::SetSpeed);
    }

    if let Some(rest) = line.strip_prefix(JOGSPEED) {
        return parse_argument(rest, mode, JOGSPEED, true).map(Command::SetJogSpeed);
    }

    match mode {
        ParseMode::Permissive => Ok(Command::Unrecognized(truncated(line))),
        ParseMode::Strict => Err(CommandError::UnknownCommand(truncated(line))),
    }
}

fn parse_argument(
    rest: &str,
    mode: ParseMode,
    command: &'static str,
    non_negative: bool,
) -> Result<Option<f32>, CommandError> {
    match mode {
        ParseMode::Permissive => Ok(first_float(rest)),
        ParseMode::Strict => {
            let invalid = CommandError::InvalidArgument { command };

            if !rest.starts_with(|c: char| c.is_whitespace()) {
                return Err(invalid);
            }
            let mut tokens = rest.split_whitespace();
            let value = match (tokens.next(), tokens.next()) {
                (Some(token), None) => token.parse::<f32>().map_err(|_| invalid.clone())?,
                _ => return Err(invalid),
            };
            if !value.is_finite() || (non_negative && value < 0.0) {
                return Err(invalid);
            }
            Ok(Some(value))
        }
    }
}

/// First decimal number in `text`.
///
/// Accepts `[+-]digits[.digits][e[+-]digits]` and the leading-dot form
/// `[+-].digits`. Returns `None` if there is no number or the first one
/// overflows.
pub fn first_float(text: &str) -> Option<f32> {
    let bytes = text.as_bytes();
    (0..bytes.len()).find_map(|start| {
        let end = match_float(bytes, start)?;
        // Matched bytes are ASCII so `start..end` is a char boundary
        let value = text[start..end].parse::<f32>().ok()?;
        Some(value.is_finite().then_some(value))
    })?
}

/// End of the number starting at `start`, if one does.
fn match_float(bytes: &[u8], start: usize) -> Option<usize> {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_end = digits_from(i);
    let has_int = int_end > i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        if frac_end > i + 1 {
            i = frac_end;
        } else if !has_int {
            return None;
        }
    } else if !has_int {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    Some(i)
}

fn truncated(line: &str) -> String<64> {
    let mut out = String::new();
    for c in line.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
