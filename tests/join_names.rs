//! spec.md §8: JOIN followed by NAMES reports the joining user back to
//! itself and to an existing channel member.

mod common;

use corvid_proto::Command;

use common::TestServer;

#[tokio::test]
async fn join_then_names_lists_both_members() {
    let server = TestServer::spawn(16671).await.expect("server should start");

    let mut alice = server.connect("alice").await.expect("connect alice");
    alice.register().await.expect("alice registers");
    alice.join("#lobby").await.expect("alice joins");
    // RPL_NAMREPLY then RPL_ENDOFNAMES for alice's own join.
    alice
        .recv_until(|msg| matches!(&msg.command, Command::Response(resp, _) if resp.code() == 366))
        .await
        .expect("alice sees end of names");

    let mut bob = server.connect("bob").await.expect("connect bob");
    bob.register().await.expect("bob registers");
    bob.join("#lobby").await.expect("bob joins");

    // alice should see bob's JOIN line.
    let join_seen = alice
        .recv_until(|msg| matches!(&msg.command, Command::JOIN(..)))
        .await
        .expect("alice observes a join");
    assert!(join_seen.iter().any(|m| matches!(&m.command, Command::JOIN(chan, ..) if chan == "#lobby")));

    let names = bob
        .recv_until(|msg| matches!(&msg.command, Command::Response(resp, _) if resp.code() == 366))
        .await
        .expect("bob sees end of names");
    let has_both = names.iter().any(|msg| {
        matches!(&msg.command, Command::Response(resp, params) if resp.code() == 353
            && params.last().is_some_and(|list| list.contains("alice") && list.contains("bob")))
    });
    assert!(has_both, "NAMREPLY should list both alice and bob");
}
