//! Registration and connection-lifecycle commands: PASS, NICK, USER,
//! QUIT, PING, PONG, AWAY.
//!
//! Grounded in the teacher's `handlers/connection/registration.rs`
//! state machine (`RegistrationPhase` transition table), simplified
//! because a single core loop, not a registration actor racing the
//! channel-join actors, owns the decision of when a client becomes
//! fully registered.

use corvid_proto::{Command, Message, NickExt, Prefix, Response};

use crate::error::{HandlerError, HandlerResult};
use crate::state::user::RegistrationPhase;
use crate::state::Server;

pub fn pass(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::PASS(password) = cmd else {
        return Ok(());
    };
    let user = server.user_mut(uid).ok_or(HandlerError::NotRegistered)?;
    if user.phase != RegistrationPhase::Connecting {
        return Err(HandlerError::AlreadyRegistered);
    }
    user.password = Some(password);
    Ok(())
}

pub fn nick(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::NICK(new_nick) = cmd else {
        return Ok(());
    };
    if !new_nick.is_valid_nick() {
        return Err(HandlerError::ErroneousNickname(new_nick));
    }
    if server.find_uid_by_nick(&new_nick).is_some_and(|owner| owner != uid) {
        return Err(HandlerError::NicknameInUse(new_nick));
    }
    if server
        .xlines
        .find_matching(crate::state::xline::XlineKind::Q, &new_nick, crate::state::now_unix())
        .is_some()
    {
        return Err(HandlerError::ErroneousNickname(new_nick));
    }

    let user = server.user(uid).ok_or(HandlerError::NotRegistered)?;
    if server.hooks.check_before_nick_change(user, &new_nick) == crate::state::hooks::HookDecision::Deny {
        return Err(HandlerError::AccessDenied);
    }

    let old_nick = user.nick.clone();
    let was_set = old_nick != "*";
    let phase = user.phase;

    server.reindex_nick(&old_nick, &new_nick, uid);
    let user = server.user_mut(uid).unwrap();
    user.nick = new_nick.clone();

    if was_set {
        let hostmask = format!("{old_nick}!{}@{}", user.user, user.host);
        let uid_owned = uid.to_string();
        announce_to_common_channels(server, &uid_owned, &hostmask, &new_nick);
    } else if phase == RegistrationPhase::Connecting {
        advance_registration(server, uid, RegistrationPhase::NickSet);
    } else if phase == RegistrationPhase::UserSet {
        complete_registration(server, uid);
    }
    Ok(())
}

fn announce_to_common_channels(server: &mut Server, uid: &str, old_hostmask: &str, new_nick: &str) {
    let channels: Vec<String> = server
        .user(uid)
        .map(|u| u.channels.iter().cloned().collect())
        .unwrap_or_default();
    let line = format!(":{old_hostmask} NICK :{new_nick}\r\n");
    let mut notified = std::collections::HashSet::new();
    for chan_name in channels {
        let Some(chan) = server.channel(&chan_name) else {
            continue;
        };
        for member_uid in chan.members.keys() {
            if notified.insert(member_uid.clone()) {
                server.send_line(member_uid, line.clone());
            }
        }
    }
    if notified.is_empty() {
        server.send_line(uid, line);
    }
}

pub fn user(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::USER(username, _mode, realname) = cmd else {
        return Ok(());
    };
    let u = server.user_mut(uid).ok_or(HandlerError::NotRegistered)?;
    if u.phase != RegistrationPhase::Connecting && u.phase != RegistrationPhase::NickSet {
        return Err(HandlerError::AlreadyRegistered);
    }
    u.user = username;
    u.realname = realname;

    match u.phase {
        RegistrationPhase::Connecting => advance_registration(server, uid, RegistrationPhase::UserSet),
        RegistrationPhase::NickSet => complete_registration(server, uid),
        _ => unreachable!("checked above"),
    }
    Ok(())
}

fn advance_registration(server: &mut Server, uid: &str, phase: RegistrationPhase) {
    if let Some(u) = server.user_mut(uid) {
        u.phase = phase;
    }
}

fn complete_registration(server: &mut Server, uid: &str) {
    let Some(user) = server.user(uid) else { return };
    let subject = format!("{}@{}", user.user, user.host);
    let now = crate::state::now_unix();
    let blocked = server
        .xlines
        .find_matching(crate::state::xline::XlineKind::K, &subject, now)
        .or_else(|| server.xlines.find_matching(crate::state::xline::XlineKind::G, &subject, now))
        .cloned();

    if let Some(line) = blocked {
        server.send_line(
            uid,
            format!(
                "ERROR :Closing Link: [{}-Lined: {}]\r\n",
                line.kind.letter(),
                line.reason
            ),
        );
        let reason = format!("{}-Lined", line.kind.letter());
        let (hostmask, vacated) = server.remove_user(uid, &reason);
        super::broadcast_quit(server, &hostmask, &vacated, &reason);
        return;
    }

    advance_registration(server, uid, RegistrationPhase::Registered);
    let Some(user) = server.user(uid) else { return };
    let nick = user.nick.clone();
    let server_name = server.server_name.clone();
    let network = server.config.network_name.clone();
    let created = chrono::DateTime::from_timestamp(server.created_at, 0)
        .map(|dt| dt.format("%a %b %e %Y at %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "an unknown time".to_string());

    let welcome = [
        (
            Response::RPL_WELCOME,
            format!("Welcome to the {network} Network, {nick}"),
        ),
        (
            Response::RPL_YOURHOST,
            format!("Your host is {server_name}, running corvidd"),
        ),
        (
            Response::RPL_CREATED,
            format!("This server was created {created}"),
        ),
    ];
    for (resp, text) in welcome {
        send_numeric(server, uid, resp, vec![nick.clone(), text]);
    }
    send_numeric(
        server,
        uid,
        Response::RPL_MYINFO,
        vec![nick.clone(), server_name, "corvidd-0.1".to_string()],
    );

    super::query::send_motd(server, uid);
}

pub(super) fn send_numeric(server: &Server, uid: &str, resp: Response, params: Vec<String>) {
    let msg = Message {
        tags: None,
        prefix: Some(Prefix::ServerName(server.server_name.clone())),
        command: Command::Response(resp, params),
    };
    server.send_message(uid, &msg);
}

pub fn quit(_server: &mut Server, _uid: &str, cmd: Command) -> HandlerResult {
    let Command::QUIT(reason) = cmd else {
        return Ok(());
    };
    Err(HandlerError::Quit(reason))
}

pub fn ping(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::PING(token, _) = cmd else {
        return Ok(());
    };
    server.send_line(uid, format!(":{} PONG {} :{token}\r\n", server.server_name, server.server_name));
    touch_activity(server, uid);
    Ok(())
}

pub fn pong(server: &mut Server, uid: &str, _cmd: Command) -> HandlerResult {
    touch_activity(server, uid);
    Ok(())
}

fn touch_activity(server: &mut Server, uid: &str) {
    let now = crate::state::now_unix();
    if let Some(u) = server.user_mut(uid) {
        u.last_activity = now;
    }
}

pub fn away(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::AWAY(message) = cmd else {
        return Ok(());
    };
    let nick = server.user(uid).map(|u| u.nick.clone()).unwrap_or_default();
    let is_away = message.is_some();
    if let Some(u) = server.user_mut(uid) {
        u.away = message;
    }
    let resp = if is_away {
        Response::RPL_NOWAWAY
    } else {
        Response::RPL_UNAWAY
    };
    let text = if is_away {
        "You have been marked as being away"
    } else {
        "You are no longer marked as being away"
    };
    send_numeric(server, uid, resp, vec![nick, text.to_string()]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::xline::{XLine, XlineKind};

    fn test_config() -> Config {
        toml::from_str(
            r#"
            server_name = "irc.example.org"
            network_name = "ExampleNet"
            bind = ["127.0.0.1:6667"]
            "#,
        )
        .unwrap()
    }

    fn connecting_user(server: &mut Server, uid: &str, host: &str) {
        let now = crate::state::now_unix();
        let user = crate::state::user::User::new(
            uid.to_string(),
            host.to_string(),
            "127.0.0.1".parse().unwrap(),
            now,
        );
        server.users.insert(uid.to_string(), user);
    }

    #[test]
    fn nick_then_user_completes_registration() {
        let mut server = Server::new(test_config(), 0);
        connecting_user(&mut server, "u1", "client.example.org");

        nick(&mut server, "u1", Command::NICK("alice".into())).unwrap();
        assert_eq!(server.user("u1").unwrap().phase, RegistrationPhase::NickSet);

        user(
            &mut server,
            "u1",
            Command::USER("alice".into(), "0".into(), "Alice".into()),
        )
        .unwrap();
        assert_eq!(server.user("u1").unwrap().phase, RegistrationPhase::Registered);
    }

    #[test]
    fn nick_collision_is_rejected() {
        let mut server = Server::new(test_config(), 0);
        connecting_user(&mut server, "u1", "client.example.org");
        connecting_user(&mut server, "u2", "client.example.org");
        nick(&mut server, "u1", Command::NICK("alice".into())).unwrap();
        let result = nick(&mut server, "u2", Command::NICK("alice".into()));
        assert!(matches!(result, Err(HandlerError::NicknameInUse(_))));
    }

    #[test]
    fn kline_at_registration_disconnects_before_welcome() {
        let mut server = Server::new(test_config(), 0);
        server.xlines.add(XLine {
            kind: XlineKind::K,
            mask: "*@evil.example.org".into(),
            reason: "go away".into(),
            set_by: "oper".into(),
            set_at: 0,
            expires_at: None,
        });
        connecting_user(&mut server, "u1", "evil.example.org");

        nick(&mut server, "u1", Command::NICK("mallory".into())).unwrap();
        user(
            &mut server,
            "u1",
            Command::USER("mallory".into(), "0".into(), "Mallory".into()),
        )
        .unwrap();

        assert!(server.user("u1").is_none());
    }

    #[test]
    fn gline_does_not_block_unrelated_host() {
        let mut server = Server::new(test_config(), 0);
        server.xlines.add(XLine {
            kind: XlineKind::G,
            mask: "*@evil.example.org".into(),
            reason: "go away".into(),
            set_by: "oper".into(),
            set_at: 0,
            expires_at: None,
        });
        connecting_user(&mut server, "u1", "good.example.org");

        nick(&mut server, "u1", Command::NICK("bob".into())).unwrap();
        user(
            &mut server,
            "u1",
            Command::USER("bob".into(), "0".into(), "Bob".into()),
        )
        .unwrap();

        assert_eq!(server.user("u1").unwrap().phase, RegistrationPhase::Registered);
    }
}
