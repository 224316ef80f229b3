//! IRC command parsing implementation.

mod channel;
mod connection;
mod messaging;
mod query;
mod user;

use super::types::Command;
use crate::chan::ChannelExt;
use crate::error::MessageParseError;
use crate::mode::Mode;

/// Parse a MODE command, dispatching to channel or user mode parsing.
fn parse_mode_command(original_cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
    if args.is_empty() {
        return Ok(connection::raw(original_cmd, args));
    }

    let target = args[0];
    let mode_args = &args[1..];

    if target.is_channel_name() {
        Ok(Command::ChannelMODE(
            target.to_owned(),
            Mode::as_channel_modes(mode_args)?,
        ))
    } else {
        Ok(Command::UserMODE(
            target.to_owned(),
            Mode::as_user_modes(mode_args)?,
        ))
    }
}

impl Command {
    /// Parse a command from its name and arguments.
    #[must_use = "command parsing result should be handled"]
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        let cmd_upper = cmd.to_ascii_uppercase();
        let cmd_str = cmd_upper.as_str();

        match cmd_str {
            "PASS" | "NICK" | "USER" | "OPER" | "QUIT" => connection::parse(cmd_str, args),

            "JOIN" | "PART" | "TOPIC" | "NAMES" | "LIST" | "INVITE" | "KICK" => {
                channel::parse(cmd_str, args)
            }

            "MOTD" => query::parse(cmd_str, args),

            "WHO" | "WHOIS" | "WHOWAS" => user::parse(cmd_str, args),

            "PRIVMSG" | "NOTICE" | "PING" | "PONG" | "ERROR" | "AWAY" | "REHASH" | "DIE"
            | "RESTART" | "WALLOPS" | "KILL" | "KLINE" | "UNKLINE" | "GLINE" | "UNGLINE"
            | "ZLINE" | "UNZLINE" | "QLINE" | "UNQLINE" | "ELINE" | "UNELINE" => {
                messaging::parse(cmd_str, args)
            }

            "MODE" => parse_mode_command(cmd, args),

            _ => {
                if let Ok(resp) = cmd.parse() {
                    Ok(Command::Response(
                        resp,
                        args.into_iter().map(|s| s.to_owned()).collect(),
                    ))
                } else {
                    Ok(connection::raw(cmd, args))
                }
            }
        }
    }
}
