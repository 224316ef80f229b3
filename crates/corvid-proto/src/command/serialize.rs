use std::fmt::{self, Write};

use super::types::Command;
use super::util::{needs_colon_prefix, write_args_with_trailing, write_cmd, write_cmd_freeform};

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(p) => write_cmd(f, "PASS", &[p]).map(|_| ()),
            Command::NICK(n) => write_cmd(f, "NICK", &[n]).map(|_| ()),
            Command::USER(u, m, r) => write_cmd_freeform(f, "USER", &[u, m, "*", r]).map(|_| ()),
            Command::OPER(u, p) => write_cmd(f, "OPER", &[u, p]).map(|_| ()),
            Command::UserMODE(u, modes) => {
                f.write_str("MODE ")?;
                f.write_str(u)?;
                if !modes.is_empty() {
                    f.write_char(' ')?;
                    super::util::write_collapsed_mode_flags(f, modes)?;
                }
                Ok(())
            }
            Command::QUIT(Some(m)) => write_cmd(f, "QUIT", &[m]).map(|_| ()),
            Command::QUIT(None) => write_cmd(f, "QUIT", &[]).map(|_| ()),
            Command::JOIN(c, Some(k), Some(n)) => write_cmd(f, "JOIN", &[c, k, n]).map(|_| ()),
            Command::JOIN(c, Some(k), None) => write_cmd(f, "JOIN", &[c, k]).map(|_| ()),
            Command::JOIN(c, None, Some(n)) => write_cmd(f, "JOIN", &[c, n]).map(|_| ()),
            Command::JOIN(c, None, None) => write_cmd(f, "JOIN", &[c]).map(|_| ()),
            Command::PART(c, Some(m)) => write_cmd_freeform(f, "PART", &[c, m]).map(|_| ()),
            Command::PART(c, None) => write_cmd(f, "PART", &[c]).map(|_| ()),
            Command::ChannelMODE(c, modes) => {
                f.write_str("MODE ")?;
                f.write_str(c)?;
                if !modes.is_empty() {
                    f.write_char(' ')?;
                    super::util::write_collapsed_mode_flags(f, modes)?;
                    let mode_args: Vec<_> = modes.iter().filter_map(|m| m.arg()).collect();
                    for (i, arg) in mode_args.iter().enumerate() {
                        super::util::validate_param(f, arg)?;
                        f.write_char(' ')?;
                        let is_last = i == mode_args.len() - 1;
                        if is_last && needs_colon_prefix(arg) {
                            f.write_char(':')?;
                        }
                        f.write_str(arg)?;
                    }
                }
                Ok(())
            }
            Command::TOPIC(c, Some(t)) => write_cmd_freeform(f, "TOPIC", &[c, t]).map(|_| ()),
            Command::TOPIC(c, None) => write_cmd(f, "TOPIC", &[c]).map(|_| ()),
            Command::NAMES(Some(c), Some(t)) => write_cmd(f, "NAMES", &[c, t]).map(|_| ()),
            Command::NAMES(Some(c), None) => write_cmd(f, "NAMES", &[c]).map(|_| ()),
            Command::NAMES(None, _) => write_cmd(f, "NAMES", &[]).map(|_| ()),
            Command::LIST(Some(c), Some(t)) => write_cmd(f, "LIST", &[c, t]).map(|_| ()),
            Command::LIST(Some(c), None) => write_cmd(f, "LIST", &[c]).map(|_| ()),
            Command::LIST(None, _) => write_cmd(f, "LIST", &[]).map(|_| ()),
            Command::INVITE(n, c) => write_cmd_freeform(f, "INVITE", &[n, c]).map(|_| ()),
            Command::KICK(c, n, Some(r)) => write_cmd_freeform(f, "KICK", &[c, n, r]).map(|_| ()),
            Command::KICK(c, n, None) => write_cmd(f, "KICK", &[c, n]).map(|_| ()),
            Command::PRIVMSG(t, m) => write_cmd_freeform(f, "PRIVMSG", &[t, m]).map(|_| ()),
            Command::NOTICE(t, m) => write_cmd_freeform(f, "NOTICE", &[t, m]).map(|_| ()),
            Command::MOTD(Some(t)) => write_cmd(f, "MOTD", &[t]).map(|_| ()),
            Command::MOTD(None) => write_cmd(f, "MOTD", &[]).map(|_| ()),
            Command::WHO(Some(s), Some(flags)) => write_cmd(f, "WHO", &[s, flags]).map(|_| ()),
            Command::WHO(Some(s), None) => write_cmd(f, "WHO", &[s]).map(|_| ()),
            Command::WHO(None, _) => write_cmd(f, "WHO", &[]).map(|_| ()),
            Command::WHOIS(Some(t), m) => write_cmd(f, "WHOIS", &[t, m]).map(|_| ()),
            Command::WHOIS(None, m) => write_cmd(f, "WHOIS", &[m]).map(|_| ()),
            Command::WHOWAS(n, Some(c), Some(t)) => write_cmd(f, "WHOWAS", &[n, c, t]).map(|_| ()),
            Command::WHOWAS(n, Some(c), None) => write_cmd(f, "WHOWAS", &[n, c]).map(|_| ()),
            Command::WHOWAS(n, None, Some(c)) => write_cmd(f, "WHOWAS", &[n, c]).map(|_| ()),
            Command::WHOWAS(n, None, None) => write_cmd(f, "WHOWAS", &[n]).map(|_| ()),
            Command::KILL(n, c) => write_cmd_freeform(f, "KILL", &[n, c]).map(|_| ()),
            Command::PING(s, Some(t)) => write_cmd(f, "PING", &[s, t]).map(|_| ()),
            Command::PING(s, None) => write_cmd(f, "PING", &[s]).map(|_| ()),
            Command::PONG(s, Some(t)) => write_cmd(f, "PONG", &[s, t]).map(|_| ()),
            Command::PONG(s, None) => write_cmd(f, "PONG", &[s]).map(|_| ()),
            Command::ERROR(m) => write_cmd_freeform(f, "ERROR", &[m]).map(|_| ()),
            Command::AWAY(Some(m)) => write_cmd_freeform(f, "AWAY", &[m]).map(|_| ()),
            Command::AWAY(None) => write_cmd(f, "AWAY", &[]).map(|_| ()),
            Command::REHASH => write_cmd(f, "REHASH", &[]).map(|_| ()),
            Command::DIE => write_cmd(f, "DIE", &[]).map(|_| ()),
            Command::RESTART => write_cmd(f, "RESTART", &[]).map(|_| ()),
            Command::WALLOPS(t) => write_cmd_freeform(f, "WALLOPS", &[t]).map(|_| ()),
            Command::KLINE(Some(t), m, r) => write_cmd_freeform(f, "KLINE", &[t, m, r]).map(|_| ()),
            Command::KLINE(None, m, r) => write_cmd_freeform(f, "KLINE", &[m, r]).map(|_| ()),
            Command::UNKLINE(m) => write_cmd(f, "UNKLINE", &[m]).map(|_| ()),
            Command::GLINE(m, Some(r)) => write_cmd_freeform(f, "GLINE", &[m, r]).map(|_| ()),
            Command::GLINE(m, None) => write_cmd(f, "GLINE", &[m]).map(|_| ()),
            Command::UNGLINE(m) => write_cmd(f, "UNGLINE", &[m]).map(|_| ()),
            Command::ZLINE(ip, Some(r)) => write_cmd_freeform(f, "ZLINE", &[ip, r]).map(|_| ()),
            Command::ZLINE(ip, None) => write_cmd(f, "ZLINE", &[ip]).map(|_| ()),
            Command::UNZLINE(ip) => write_cmd(f, "UNZLINE", &[ip]).map(|_| ()),
            Command::QLINE(n, Some(r)) => write_cmd_freeform(f, "QLINE", &[n, r]).map(|_| ()),
            Command::QLINE(n, None) => write_cmd(f, "QLINE", &[n]).map(|_| ()),
            Command::UNQLINE(n) => write_cmd(f, "UNQLINE", &[n]).map(|_| ()),
            Command::ELINE(m, Some(r)) => write_cmd_freeform(f, "ELINE", &[m, r]).map(|_| ()),
            Command::ELINE(m, None) => write_cmd(f, "ELINE", &[m]).map(|_| ()),
            Command::UNELINE(m) => write_cmd(f, "UNELINE", &[m]).map(|_| ()),
            Command::Response(resp, a) => {
                let code = *resp as u16;
                write!(f, "{:03}", code)?;
                for arg in a.iter().take(a.len().saturating_sub(1)) {
                    f.write_char(' ')?;
                    f.write_str(arg)?;
                }
                if let Some(last) = a.last() {
                    f.write_char(' ')?;
                    if needs_colon_prefix(last) {
                        f.write_char(':')?;
                    }
                    f.write_str(last)?;
                }
                Ok(())
            }
            Command::Raw(c, a) => {
                f.write_str(c)?;
                write_args_with_trailing(f, a.iter().map(String::as_str)).map(|_| ())
            }
        }
    }
}
