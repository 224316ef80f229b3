use super::super::types::Command;
use super::connection::raw;
use crate::error::MessageParseError;

pub(super) fn parse(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
    let result = match cmd {
        "PRIVMSG" => {
            if args.len() != 2 {
                raw(cmd, args)
            } else {
                Command::PRIVMSG(args[0].to_owned(), args[1].to_owned())
            }
        }
        "NOTICE" => {
            if args.len() != 2 {
                raw(cmd, args)
            } else {
                Command::NOTICE(args[0].to_owned(), args[1].to_owned())
            }
        }

        "KILL" => {
            if args.len() != 2 {
                raw(cmd, args)
            } else {
                Command::KILL(args[0].to_owned(), args[1].to_owned())
            }
        }
        "PING" => {
            if args.len() == 1 {
                Command::PING(args[0].to_owned(), None)
            } else if args.len() == 2 {
                Command::PING(args[0].to_owned(), Some(args[1].to_owned()))
            } else {
                raw(cmd, args)
            }
        }
        "PONG" => {
            if args.len() == 1 {
                Command::PONG(args[0].to_owned(), None)
            } else if args.len() == 2 {
                Command::PONG(args[0].to_owned(), Some(args[1].to_owned()))
            } else {
                raw(cmd, args)
            }
        }
        "ERROR" => {
            if args.len() != 1 {
                raw(cmd, args)
            } else {
                Command::ERROR(args[0].to_owned())
            }
        }

        "AWAY" => {
            if args.is_empty() {
                Command::AWAY(None)
            } else if args.len() == 1 {
                Command::AWAY(Some(args[0].to_owned()))
            } else {
                raw(cmd, args)
            }
        }
        "REHASH" => {
            if args.is_empty() {
                Command::REHASH
            } else {
                raw(cmd, args)
            }
        }
        "DIE" => {
            if args.is_empty() {
                Command::DIE
            } else {
                raw(cmd, args)
            }
        }
        "RESTART" => {
            if args.is_empty() {
                Command::RESTART
            } else {
                raw(cmd, args)
            }
        }
        "WALLOPS" => {
            if args.len() != 1 {
                raw(cmd, args)
            } else {
                Command::WALLOPS(args[0].to_owned())
            }
        }

        // KLINE [time] user@host :reason
        "KLINE" => {
            if args.len() == 2 {
                Command::KLINE(None, args[0].to_owned(), args[1].to_owned())
            } else if args.len() == 3 {
                Command::KLINE(
                    Some(args[0].to_owned()),
                    args[1].to_owned(),
                    args[2].to_owned(),
                )
            } else {
                raw(cmd, args)
            }
        }
        "UNKLINE" => {
            if args.len() != 1 {
                raw(cmd, args)
            } else {
                Command::UNKLINE(args[0].to_owned())
            }
        }

        // GLINE mask [reason] - network-wide host ban
        "GLINE" => {
            if args.is_empty() || args.len() > 2 {
                raw(cmd, args)
            } else if args.len() == 1 {
                Command::GLINE(args[0].to_owned(), None)
            } else {
                Command::GLINE(args[0].to_owned(), Some(args[1].to_owned()))
            }
        }
        "UNGLINE" => {
            if args.len() != 1 {
                raw(cmd, args)
            } else {
                Command::UNGLINE(args[0].to_owned())
            }
        }

        // ZLINE ip [reason] - IP ban
        "ZLINE" => {
            if args.is_empty() || args.len() > 2 {
                raw(cmd, args)
            } else if args.len() == 1 {
                Command::ZLINE(args[0].to_owned(), None)
            } else {
                Command::ZLINE(args[0].to_owned(), Some(args[1].to_owned()))
            }
        }
        "UNZLINE" => {
            if args.len() != 1 {
                raw(cmd, args)
            } else {
                Command::UNZLINE(args[0].to_owned())
            }
        }

        // QLINE nick [reason] - nick ban
        "QLINE" => {
            if args.is_empty() || args.len() > 2 {
                raw(cmd, args)
            } else if args.len() == 1 {
                Command::QLINE(args[0].to_owned(), None)
            } else {
                Command::QLINE(args[0].to_owned(), Some(args[1].to_owned()))
            }
        }
        "UNQLINE" => {
            if args.len() != 1 {
                raw(cmd, args)
            } else {
                Command::UNQLINE(args[0].to_owned())
            }
        }

        // ELINE mask [reason] - exception from K/G/Z/Q matches
        "ELINE" => {
            if args.is_empty() || args.len() > 2 {
                raw(cmd, args)
            } else if args.len() == 1 {
                Command::ELINE(args[0].to_owned(), None)
            } else {
                Command::ELINE(args[0].to_owned(), Some(args[1].to_owned()))
            }
        }
        "UNELINE" => {
            if args.len() != 1 {
                raw(cmd, args)
            } else {
                Command::UNELINE(args[0].to_owned())
            }
        }

        _ => unreachable!(
            "messaging::parse called with non-messaging command: {}",
            cmd
        ),
    };

    Ok(result)
}
