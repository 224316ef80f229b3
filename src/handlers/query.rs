//! Informational queries: MOTD, WHO, WHOIS, WHOWAS.
//!
//! Grounded in the teacher's `handlers/query/*.rs`, with WHOIS's
//! server-to-server forwarding (querying a remote server's view of a
//! user) dropped since there is only ever one server to ask.

use corvid_proto::{wildcard_match, ChannelExt, Command, Response};

use crate::error::HandlerError;
use crate::error::HandlerResult;
use crate::state::Server;

use super::connection::send_numeric;

/// Send the MOTD burst, or `ERR_NOMOTD` if none is configured. Shared
/// between the `MOTD` command and the welcome burst at registration.
pub fn send_motd(server: &Server, uid: &str) {
    let nick = nick_of(server, uid);
    if server.config.motd.is_empty() {
        send_numeric(
            server,
            uid,
            Response::ERR_NOMOTD,
            vec![nick, "MOTD File is missing".to_string()],
        );
        return;
    }
    send_numeric(
        server,
        uid,
        Response::RPL_MOTDSTART,
        vec![
            nick.clone(),
            format!("- {} Message of the Day -", server.server_name),
        ],
    );
    for line in &server.config.motd {
        send_numeric(
            server,
            uid,
            Response::RPL_MOTD,
            vec![nick.clone(), format!("- {line}")],
        );
    }
    send_numeric(
        server,
        uid,
        Response::RPL_ENDOFMOTD,
        vec![nick, "End of /MOTD command.".to_string()],
    );
}

pub fn motd(server: &mut Server, uid: &str, _cmd: Command) -> HandlerResult {
    send_motd(server, uid);
    Ok(())
}

pub fn who(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::WHO(mask, _flags) = cmd else {
        return Ok(());
    };
    let nick = nick_of(server, uid);
    let mask = mask.unwrap_or_else(|| "*".to_string());

    let targets: Vec<String> = if mask.is_channel_name() {
        server
            .channel(&mask)
            .map(|c| c.members.keys().cloned().collect())
            .unwrap_or_default()
    } else {
        server
            .users
            .values()
            .filter(|u| u.is_registered() && wildcard_match(&mask, &u.nick))
            .map(|u| u.uid.clone())
            .collect()
    };

    for target_uid in targets {
        let Some(target) = server.user(&target_uid) else {
            continue;
        };
        let chan_name = target.channels.iter().next().cloned().unwrap_or_else(|| "*".to_string());
        let mut flags = if target.away.is_some() { "G".to_string() } else { "H".to_string() };
        if target.modes.oper {
            flags.push('*');
        }
        send_numeric(
            server,
            uid,
            Response::RPL_WHOREPLY,
            vec![
                nick.clone(),
                chan_name,
                target.user.clone(),
                target.host.clone(),
                server.server_name.clone(),
                target.nick.clone(),
                flags,
                format!("0 {}", target.realname),
            ],
        );
    }
    send_numeric(
        server,
        uid,
        Response::RPL_ENDOFWHO,
        vec![nick, mask, "End of /WHO list.".to_string()],
    );
    Ok(())
}

pub fn whois(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::WHOIS(_target_server, nickmasks) = cmd else {
        return Ok(());
    };
    let nick = nick_of(server, uid);

    for target_nick in nickmasks.split(',') {
        let Some(target_uid) = server.find_uid_by_nick(target_nick).map(str::to_string) else {
            send_numeric(
                server,
                uid,
                Response::ERR_NOSUCHNICK,
                vec![nick.clone(), target_nick.to_string(), "No such nick/channel".to_string()],
            );
            continue;
        };
        let Some((t_nick, t_user, t_host, t_realname, t_oper, t_away, t_channels)) =
            server.user(&target_uid).map(|t| {
                (
                    t.nick.clone(),
                    t.user.clone(),
                    t.host.clone(),
                    t.realname.clone(),
                    t.modes.oper,
                    t.away.clone(),
                    t.channels.clone(),
                )
            })
        else {
            continue;
        };

        send_numeric(
            server,
            uid,
            Response::RPL_WHOISUSER,
            vec![nick.clone(), t_nick.clone(), t_user, t_host, "*".to_string(), t_realname],
        );
        send_numeric(
            server,
            uid,
            Response::RPL_WHOISSERVER,
            vec![
                nick.clone(),
                t_nick.clone(),
                server.server_name.clone(),
                "corvidd IRC server".to_string(),
            ],
        );
        if t_oper {
            send_numeric(
                server,
                uid,
                Response::RPL_WHOISOPERATOR,
                vec![nick.clone(), t_nick.clone(), "is an IRC operator".to_string()],
            );
        }
        if !t_channels.is_empty() {
            let mut chans: Vec<String> = Vec::new();
            for chan_name in &t_channels {
                if let Some(chan) = server.channel(chan_name) {
                    let prefix = chan
                        .member(&target_uid)
                        .and_then(|m| m.modes.prefix_char())
                        .map(|c| c.to_string())
                        .unwrap_or_default();
                    chans.push(format!("{prefix}{chan_name}"));
                }
            }
            chans.sort();
            send_numeric(
                server,
                uid,
                Response::RPL_WHOISCHANNELS,
                vec![nick.clone(), t_nick.clone(), chans.join(" ")],
            );
        }
        if let Some(away) = t_away {
            send_numeric(server, uid, Response::RPL_AWAY, vec![nick.clone(), t_nick.clone(), away]);
        }
        send_numeric(
            server,
            uid,
            Response::RPL_ENDOFWHOIS,
            vec![nick.clone(), t_nick, "End of /WHOIS list.".to_string()],
        );
    }
    Ok(())
}

pub fn whowas(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::WHOWAS(target_nick, count, _target) = cmd else {
        return Ok(());
    };
    let nick = nick_of(server, uid);
    let limit = count
        .and_then(|c| c.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(usize::MAX);

    let matches: Vec<_> = server
        .whowas
        .iter()
        .rev()
        .filter(|e| corvid_proto::casemap::irc_eq(&e.nick, &target_nick))
        .take(limit)
        .cloned()
        .collect();

    if matches.is_empty() {
        return Err(HandlerError::WasNoSuchNick(target_nick));
    }
    for entry in &matches {
        send_numeric(
            server,
            uid,
            Response::RPL_WHOWASUSER,
            vec![
                nick.clone(),
                entry.nick.clone(),
                entry.user.clone(),
                entry.host.clone(),
                "*".to_string(),
                entry.realname.clone(),
            ],
        );
    }
    send_numeric(
        server,
        uid,
        Response::RPL_ENDOFWHOWAS,
        vec![nick, target_nick, "End of WHOWAS".to_string()],
    );
    Ok(())
}

fn nick_of(server: &Server, uid: &str) -> String {
    server.user(uid).map(|u| u.nick.clone()).unwrap_or_else(|| "*".to_string())
}
