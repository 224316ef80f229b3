//! Command encoding implementation.

use std::io::{self, Write};

use super::IrcEncode;
use crate::command::util::{
    needs_colon_prefix, write_args_with_trailing, write_cmd, write_cmd_freeform,
    write_collapsed_mode_flags, IoWriteSink, IrcSink,
};
use crate::command::Command;

impl IrcEncode for Command {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        let mut sink = IoWriteSink(w);
        let w = &mut sink;

        match self {
            Command::PASS(p) => write_cmd(w, "PASS", &[p]),
            Command::NICK(n) => write_cmd(w, "NICK", &[n]),
            Command::USER(u, m, r) => write_cmd_freeform(w, "USER", &[u, m, "*", r]),
            Command::OPER(u, p) => write_cmd(w, "OPER", &[u, p]),
            Command::UserMODE(u, modes) => {
                let mut written = w.write_str("MODE ")?;
                written += w.write_str(u)?;
                if !modes.is_empty() {
                    written += w.write_char(' ')?;
                    written += write_collapsed_mode_flags(w, modes)?;
                }
                Ok(written)
            }
            Command::QUIT(Some(m)) => write_cmd(w, "QUIT", &[m]),
            Command::QUIT(None) => w.write_str("QUIT"),

            // Channel Operations
            Command::JOIN(c, Some(k), Some(n)) => write_cmd(w, "JOIN", &[c, k, n]),
            Command::JOIN(c, Some(k), None) => write_cmd(w, "JOIN", &[c, k]),
            Command::JOIN(c, None, Some(n)) => write_cmd(w, "JOIN", &[c, n]),
            Command::JOIN(c, None, None) => write_cmd(w, "JOIN", &[c]),
            Command::PART(c, Some(m)) => write_cmd_freeform(w, "PART", &[c, m]),
            Command::PART(c, None) => write_cmd(w, "PART", &[c]),
            Command::ChannelMODE(c, modes) => {
                let mut written = w.write_str("MODE ")?;
                written += w.write_str(c)?;
                if !modes.is_empty() {
                    written += w.write_char(' ')?;
                    written += write_collapsed_mode_flags(w, modes)?;
                    let mode_args: Vec<_> = modes.iter().filter_map(|m| m.arg()).collect();
                    for (i, arg) in mode_args.iter().enumerate() {
                        written += w.write_char(' ')?;
                        let is_last = i == mode_args.len() - 1;
                        if is_last && needs_colon_prefix(arg) {
                            written += w.write_char(':')?;
                        }
                        written += w.write_str(arg)?;
                    }
                }
                Ok(written)
            }
            Command::TOPIC(c, Some(t)) => write_cmd_freeform(w, "TOPIC", &[c, t]),
            Command::TOPIC(c, None) => write_cmd(w, "TOPIC", &[c]),
            Command::NAMES(Some(c), Some(t)) => write_cmd(w, "NAMES", &[c, t]),
            Command::NAMES(Some(c), None) => write_cmd(w, "NAMES", &[c]),
            Command::NAMES(None, _) => w.write_str("NAMES"),
            Command::LIST(Some(c), Some(t)) => write_cmd(w, "LIST", &[c, t]),
            Command::LIST(Some(c), None) => write_cmd(w, "LIST", &[c]),
            Command::LIST(None, _) => w.write_str("LIST"),
            Command::INVITE(n, c) => write_cmd_freeform(w, "INVITE", &[n, c]),
            Command::KICK(c, n, Some(r)) => write_cmd_freeform(w, "KICK", &[c, n, r]),
            Command::KICK(c, n, None) => write_cmd(w, "KICK", &[c, n]),

            // Messaging
            Command::PRIVMSG(t, m) => write_cmd_freeform(w, "PRIVMSG", &[t, m]),
            Command::NOTICE(t, m) => write_cmd_freeform(w, "NOTICE", &[t, m]),

            // Server Queries
            Command::MOTD(Some(t)) => write_cmd(w, "MOTD", &[t]),
            Command::MOTD(None) => w.write_str("MOTD"),

            // User Queries
            Command::WHO(Some(s), Some(flags)) => write_cmd(w, "WHO", &[s, flags]),
            Command::WHO(Some(s), None) => write_cmd(w, "WHO", &[s]),
            Command::WHO(None, _) => w.write_str("WHO"),
            Command::WHOIS(Some(t), m) => write_cmd(w, "WHOIS", &[t, m]),
            Command::WHOIS(None, m) => write_cmd(w, "WHOIS", &[m]),
            Command::WHOWAS(n, Some(c), Some(t)) => write_cmd(w, "WHOWAS", &[n, c, t]),
            Command::WHOWAS(n, Some(c), None) => write_cmd(w, "WHOWAS", &[n, c]),
            Command::WHOWAS(n, None, _) => write_cmd(w, "WHOWAS", &[n]),

            // Miscellaneous
            Command::KILL(n, c) => write_cmd_freeform(w, "KILL", &[n, c]),
            Command::PING(s, Some(t)) => write_cmd(w, "PING", &[s, t]),
            Command::PING(s, None) => write_cmd(w, "PING", &[s]),
            Command::PONG(s, Some(t)) => write_cmd(w, "PONG", &[s, t]),
            Command::PONG(s, None) => write_cmd(w, "PONG", &[s]),
            Command::ERROR(m) => write_cmd_freeform(w, "ERROR", &[m]),
            Command::AWAY(Some(m)) => write_cmd_freeform(w, "AWAY", &[m]),
            Command::AWAY(None) => w.write_str("AWAY"),
            Command::REHASH => w.write_str("REHASH"),
            Command::DIE => w.write_str("DIE"),
            Command::RESTART => w.write_str("RESTART"),
            Command::WALLOPS(t) => write_cmd_freeform(w, "WALLOPS", &[t]),

            // X-Line Access-Control Commands
            Command::KLINE(Some(t), m, r) => write_cmd_freeform(w, "KLINE", &[t, m, r]),
            Command::KLINE(None, m, r) => write_cmd_freeform(w, "KLINE", &[m, r]),
            Command::UNKLINE(m) => write_cmd(w, "UNKLINE", &[m]),
            Command::GLINE(m, Some(r)) => write_cmd_freeform(w, "GLINE", &[m, r]),
            Command::GLINE(m, None) => write_cmd(w, "GLINE", &[m]),
            Command::UNGLINE(m) => write_cmd(w, "UNGLINE", &[m]),
            Command::ZLINE(ip, Some(r)) => write_cmd_freeform(w, "ZLINE", &[ip, r]),
            Command::ZLINE(ip, None) => write_cmd(w, "ZLINE", &[ip]),
            Command::UNZLINE(ip) => write_cmd(w, "UNZLINE", &[ip]),
            Command::QLINE(n, Some(r)) => write_cmd_freeform(w, "QLINE", &[n, r]),
            Command::QLINE(n, None) => write_cmd(w, "QLINE", &[n]),
            Command::UNQLINE(n) => write_cmd(w, "UNQLINE", &[n]),
            Command::ELINE(m, Some(r)) => write_cmd_freeform(w, "ELINE", &[m, r]),
            Command::ELINE(m, None) => write_cmd(w, "ELINE", &[m]),
            Command::UNELINE(m) => write_cmd(w, "UNELINE", &[m]),

            // Numeric Response
            Command::Response(resp, args) => {
                let code = *resp as u16;
                let mut written = w.write_fmt(format_args!("{:03}", code))?;

                let len = args.len();
                for (i, arg) in args.iter().enumerate() {
                    written += w.write_char(' ')?;
                    if i == len - 1 && needs_colon_prefix(arg) {
                        written += w.write_char(':')?;
                    }
                    written += w.write_str(arg)?;
                }
                Ok(written)
            }

            // Raw
            Command::Raw(cmd, args) => {
                let mut written = w.write_str(cmd)?;
                written += write_args_with_trailing(w, args.iter().map(String::as_str))?;
                Ok(written)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to encode a command to bytes and return as UTF-8 string.
    fn encode_cmd(cmd: Command) -> String {
        let mut buf = Vec::new();
        cmd.encode(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_encode_pass() {
        assert_eq!(encode_cmd(Command::PASS("secret".into())), "PASS secret");
    }

    #[test]
    fn test_encode_nick() {
        assert_eq!(
            encode_cmd(Command::NICK("testnick".into())),
            "NICK testnick"
        );
    }

    #[test]
    fn test_encode_user() {
        assert_eq!(
            encode_cmd(Command::USER("user".into(), "0".into(), "Real Name".into())),
            "USER user 0 * :Real Name"
        );
    }

    #[test]
    fn test_encode_oper() {
        assert_eq!(
            encode_cmd(Command::OPER("admin".into(), "secret".into())),
            "OPER admin secret"
        );
    }

    #[test]
    fn test_encode_quit_with_message() {
        assert_eq!(
            encode_cmd(Command::QUIT(Some("Goodbye".into()))),
            "QUIT Goodbye"
        );
    }

    #[test]
    fn test_encode_quit_with_message_space() {
        assert_eq!(
            encode_cmd(Command::QUIT(Some("Goodbye world".into()))),
            "QUIT :Goodbye world"
        );
    }

    #[test]
    fn test_encode_quit_no_message() {
        assert_eq!(encode_cmd(Command::QUIT(None)), "QUIT");
    }

    #[test]
    fn test_encode_join_simple() {
        assert_eq!(
            encode_cmd(Command::JOIN("#channel".into(), None, None)),
            "JOIN #channel"
        );
    }

    #[test]
    fn test_encode_join_with_key() {
        assert_eq!(
            encode_cmd(Command::JOIN("#channel".into(), Some("key".into()), None)),
            "JOIN #channel key"
        );
    }

    #[test]
    fn test_encode_part_with_message() {
        assert_eq!(
            encode_cmd(Command::PART("#channel".into(), Some("Leaving".into()))),
            "PART #channel :Leaving"
        );
    }

    #[test]
    fn test_encode_part_no_message() {
        assert_eq!(
            encode_cmd(Command::PART("#channel".into(), None)),
            "PART #channel"
        );
    }

    #[test]
    fn test_encode_topic_set() {
        assert_eq!(
            encode_cmd(Command::TOPIC("#channel".into(), Some("New Topic".into()))),
            "TOPIC #channel :New Topic"
        );
    }

    #[test]
    fn test_encode_topic_query() {
        assert_eq!(
            encode_cmd(Command::TOPIC("#channel".into(), None)),
            "TOPIC #channel"
        );
    }

    #[test]
    fn test_encode_names() {
        assert_eq!(
            encode_cmd(Command::NAMES(Some("#channel".into()), None)),
            "NAMES #channel"
        );
    }

    #[test]
    fn test_encode_names_no_args() {
        assert_eq!(encode_cmd(Command::NAMES(None, None)), "NAMES");
    }

    #[test]
    fn test_encode_list() {
        assert_eq!(
            encode_cmd(Command::LIST(Some("#channel".into()), None)),
            "LIST #channel"
        );
    }

    #[test]
    fn test_encode_invite() {
        assert_eq!(
            encode_cmd(Command::INVITE("nick".into(), "#channel".into())),
            "INVITE nick :#channel"
        );
    }

    #[test]
    fn test_encode_kick_with_reason() {
        assert_eq!(
            encode_cmd(Command::KICK(
                "#channel".into(),
                "nick".into(),
                Some("Reason".into())
            )),
            "KICK #channel nick :Reason"
        );
    }

    #[test]
    fn test_encode_kick_no_reason() {
        assert_eq!(
            encode_cmd(Command::KICK("#channel".into(), "nick".into(), None)),
            "KICK #channel nick"
        );
    }

    #[test]
    fn test_encode_privmsg() {
        assert_eq!(
            encode_cmd(Command::PRIVMSG("#channel".into(), "Hello world".into())),
            "PRIVMSG #channel :Hello world"
        );
    }

    #[test]
    fn test_encode_notice() {
        assert_eq!(
            encode_cmd(Command::NOTICE("nick".into(), "You have mail".into())),
            "NOTICE nick :You have mail"
        );
    }

    #[test]
    fn test_encode_motd() {
        assert_eq!(encode_cmd(Command::MOTD(None)), "MOTD");
    }

    #[test]
    fn test_encode_who() {
        assert_eq!(
            encode_cmd(Command::WHO(Some("#channel".into()), None)),
            "WHO #channel"
        );
    }

    #[test]
    fn test_encode_who_with_flags() {
        assert_eq!(
            encode_cmd(Command::WHO(Some("#channel".into()), Some("%nuhaf".into()))),
            "WHO #channel %nuhaf"
        );
    }

    #[test]
    fn test_encode_whois() {
        assert_eq!(
            encode_cmd(Command::WHOIS(None, "nick".into())),
            "WHOIS nick"
        );
    }

    #[test]
    fn test_encode_whowas() {
        assert_eq!(
            encode_cmd(Command::WHOWAS("nick".into(), None, None)),
            "WHOWAS nick"
        );
    }

    #[test]
    fn test_encode_ping() {
        assert_eq!(
            encode_cmd(Command::PING("server".into(), None)),
            "PING server"
        );
    }

    #[test]
    fn test_encode_pong() {
        assert_eq!(
            encode_cmd(Command::PONG("server".into(), None)),
            "PONG server"
        );
    }

    #[test]
    fn test_encode_away_with_message() {
        assert_eq!(
            encode_cmd(Command::AWAY(Some("Gone fishing".into()))),
            "AWAY :Gone fishing"
        );
    }

    #[test]
    fn test_encode_away_clear() {
        assert_eq!(encode_cmd(Command::AWAY(None)), "AWAY");
    }

    #[test]
    fn test_encode_rehash() {
        assert_eq!(encode_cmd(Command::REHASH), "REHASH");
    }

    #[test]
    fn test_encode_die() {
        assert_eq!(encode_cmd(Command::DIE), "DIE");
    }

    #[test]
    fn test_encode_restart() {
        assert_eq!(encode_cmd(Command::RESTART), "RESTART");
    }

    #[test]
    fn test_encode_wallops() {
        assert_eq!(
            encode_cmd(Command::WALLOPS("Broadcast message".into())),
            "WALLOPS :Broadcast message"
        );
    }

    #[test]
    fn test_encode_kline_with_time() {
        assert_eq!(
            encode_cmd(Command::KLINE(
                Some("120".into()),
                "*@example.org".into(),
                "banned".into()
            )),
            "KLINE 120 *@example.org :banned"
        );
    }

    #[test]
    fn test_encode_gline() {
        assert_eq!(
            encode_cmd(Command::GLINE("*@example.org".into(), Some("spam".into()))),
            "GLINE *@example.org :spam"
        );
    }

    #[test]
    fn test_encode_zline() {
        assert_eq!(
            encode_cmd(Command::ZLINE("1.2.3.4".into(), None)),
            "ZLINE 1.2.3.4"
        );
    }

    #[test]
    fn test_encode_qline() {
        assert_eq!(
            encode_cmd(Command::QLINE("badnick".into(), Some("reserved".into()))),
            "QLINE badnick :reserved"
        );
    }

    #[test]
    fn test_encode_eline() {
        assert_eq!(
            encode_cmd(Command::ELINE("*@trusted.example.org".into(), None)),
            "ELINE *@trusted.example.org"
        );
    }

    #[test]
    fn test_encode_response_numeric() {
        assert_eq!(
            encode_cmd(Command::Response(
                crate::response::Response::RPL_WELCOME,
                vec!["nick".into(), "Welcome to the network".into()]
            )),
            "001 nick :Welcome to the network"
        );
    }

    #[test]
    fn test_encode_raw() {
        assert_eq!(
            encode_cmd(Command::Raw(
                "CUSTOM".into(),
                vec!["arg1".into(), "arg2".into()]
            )),
            "CUSTOM arg1 arg2"
        );
    }

    #[test]
    fn test_encode_raw_with_trailing() {
        assert_eq!(
            encode_cmd(Command::Raw(
                "CUSTOM".into(),
                vec!["arg1".into(), "with space".into()]
            )),
            "CUSTOM arg1 :with space"
        );
    }
}
