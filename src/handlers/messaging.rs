//! PRIVMSG and NOTICE.
//!
//! Grounded in the teacher's `handlers/messaging/deliver.rs`, collapsed
//! from "resolve target, ask the matrix which actor owns it, forward"
//! into a direct lookup against `server.users`/`server.channels` since
//! there's only one `Server` to look in.

use corvid_proto::{ChannelExt, Command};

use crate::error::{HandlerError, HandlerResult};
use crate::state::Server;

pub fn privmsg(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::PRIVMSG(target, text) = cmd else {
        return Ok(());
    };
    dispatch(server, uid, &target, &text, false)
}

pub fn notice(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::NOTICE(target, text) = cmd else {
        return Ok(());
    };
    dispatch(server, uid, &target, &text, true)
}

/// Split `target` on commas and deliver `text` to each, as RFC 2812
/// §3.3.1 allows. NOTICE never generates an error reply per the same
/// section's "silently ignore errors" rule; PRIVMSG surfaces the first.
fn dispatch(server: &mut Server, uid: &str, target: &str, text: &str, is_notice: bool) -> HandlerResult {
    if text.is_empty() {
        if is_notice {
            return Ok(());
        }
        return Err(HandlerError::NoTextToSend);
    }
    let nick = server.user(uid).map(|u| u.nick.clone()).unwrap_or_default();
    let hostmask = server.user(uid).map(|u| u.hostmask()).unwrap_or_default();

    let mut first_err = None;
    for single in target.split(',') {
        let result = if single.is_channel_name() {
            send_to_channel(server, uid, &hostmask, single, text, is_notice)
        } else {
            send_to_user(server, uid, &nick, &hostmask, single, text, is_notice)
        };
        if let Err(err) = result {
            if !is_notice && first_err.is_none() {
                first_err = Some(err);
            }
        }
    }
    match first_err {
        Some(err) if !is_notice => Err(err),
        _ => Ok(()),
    }
}

fn send_to_channel(
    server: &mut Server,
    uid: &str,
    hostmask: &str,
    chan_name: &str,
    text: &str,
    is_notice: bool,
) -> HandlerResult {
    let chan = server
        .channel(chan_name)
        .ok_or_else(|| HandlerError::NoSuchChannel(chan_name.to_string()))?;
    let membership = chan.member(uid);
    let can_speak = membership.map(|m| m.modes.has_voice_or_higher()).unwrap_or(false);

    if chan.modes.no_external_messages && membership.is_none() {
        return Err(HandlerError::CannotSendToChan(chan_name.to_string()));
    }
    if chan.modes.moderated && !can_speak {
        return Err(HandlerError::CannotSendToChan(chan_name.to_string()));
    }
    if chan.is_banned(hostmask) && !can_speak {
        return Err(HandlerError::CannotSendToChan(chan_name.to_string()));
    }

    let verb = if is_notice { "NOTICE" } else { "PRIVMSG" };
    let line = format!(":{hostmask} {verb} {chan_name} :{text}\r\n");
    let members: Vec<String> = chan
        .members
        .keys()
        .filter(|member_uid| member_uid.as_str() != uid)
        .cloned()
        .collect();
    for member_uid in &members {
        server.send_line(member_uid, line.clone());
    }
    Ok(())
}

fn send_to_user(
    server: &mut Server,
    uid: &str,
    nick: &str,
    hostmask: &str,
    target_nick: &str,
    text: &str,
    is_notice: bool,
) -> HandlerResult {
    let target_uid = server
        .find_uid_by_nick(target_nick)
        .ok_or_else(|| HandlerError::NoSuchTarget(target_nick.to_string()))?
        .to_string();

    let verb = if is_notice { "NOTICE" } else { "PRIVMSG" };
    server.send_line(
        &target_uid,
        format!(":{hostmask} {verb} {target_nick} :{text}\r\n"),
    );

    if !is_notice {
        let away = server.user(&target_uid).and_then(|u| u.away.clone());
        if let Some(away_msg) = away {
            super::connection::send_numeric(
                server,
                uid,
                corvid_proto::Response::RPL_AWAY,
                vec![nick.to_string(), target_nick.to_string(), away_msg],
            );
        }
    }
    Ok(())
}
