//! Unit tests for host command parsing.

use syringe_motion::config::ParseMode;
use syringe_motion::error::CommandError;
use syringe_motion::protocol::{first_float, parse_command, Command};

/// Test that every verb parses in both modes.
#[test]
fn test_all_verbs() {
    let verbs = [
        ("START", Command::Start),
        ("STOP", Command::Stop),
        ("JOG_FORWARD", Command::JogForward),
        ("JOG_BACKWARD", Command::JogBackward),
        ("STOP_JOG", Command::StopJog),
        ("HOME", Command::Home),
        ("ESTOP", Command::EStop),
        ("ENABLE", Command::Enable),
        ("DISABLE", Command::Disable),
        ("SETPOS_0", Command::ResetPositionToZero),
    ];

    for (line, expected) in verbs {
        for mode in [ParseMode::Permissive, ParseMode::Strict] {
            assert_eq!(parse_command(line, mode), Ok(expected.clone()), "{line}");
        }
        assert_eq!(expected.verb(), line);
    }
}

/// Test that the numeric verbs take their arguments.
#[test]
fn test_numeric_verbs() {
    assert_eq!(
        parse_command("SET_SPEED 400\r", ParseMode::Permissive),
        Ok(Command::SetSpeed(Some(400.0)))
    );
    assert_eq!(
        parse_command("JOGSPEED 3.5", ParseMode::Strict),
        Ok(Command::SetJogSpeed(Some(3.5)))
    );
}

/// Test that permissive parsing keeps the prior value on garbage.
#[test]
fn test_permissive_garbage_argument() {
    assert_eq!(
        parse_command("JOGSPEED fast", ParseMode::Permissive),
        Ok(Command::SetJogSpeed(None))
    );
    assert_eq!(
        parse_command("SET_SPEED", ParseMode::Permissive),
        Ok(Command::SetSpeed(None))
    );
}

/// Test that strict parsing rejects garbage.
#[test]
fn test_strict_garbage_argument() {
    assert_eq!(
        parse_command("JOGSPEED fast", ParseMode::Strict),
        Err(CommandError::InvalidArgument { command: "JOGSPEED" })
    );
    assert_eq!(
        parse_command("SET_SPEED 12abc", ParseMode::Strict),
        Err(CommandError::InvalidArgument { command: "SET_SPEED" })
    );
}

/// Test handling of unknown lines.
#[test]
fn test_unknown_lines() {
    assert!(matches!(
        parse_command("PURGE", ParseMode::Permissive),
        Ok(Command::Unrecognized(text)) if text.as_str() == "PURGE"
    ));
    assert!(matches!(
        parse_command("PURGE", ParseMode::Strict),
        Err(CommandError::UnknownCommand(_))
    ));
}

/// Test the number scanner on the argument forms hosts send.
#[test]
fn test_first_float_forms() {
    assert_eq!(first_float(" 42"), Some(42.0));
    assert_eq!(first_float("-0.5"), Some(-0.5));
    assert_eq!(first_float("+.75"), Some(0.75));
    assert_eq!(first_float("2.5E2 steps"), Some(250.0));
    assert_eq!(first_float("none"), None);
}
