//! spec.md §8: a seeded K-line rejects a matching connection during the
//! registration handshake with an ERROR line, before RPL_WELCOME.

mod common;

use corvid_proto::{Command, Message};

use common::TestServer;

#[tokio::test]
async fn kline_seed_rejects_matching_host_at_registration() {
    let extra = r#"
[[xline_seed]]
kind = "K"
mask = "*@127.0.0.1"
reason = "seeded test ban"
"#;
    let server = TestServer::spawn_with_extra(16673, extra)
        .await
        .expect("server should start");

    let mut mallory = server.connect("mallory").await.expect("connect mallory");
    mallory.send(Command::NICK("mallory".to_string())).await.expect("send nick");
    mallory
        .send(Command::USER("mallory".to_string(), "0".to_string(), "Mallory".to_string()))
        .await
        .expect("send user");

    let reply: Message = mallory.recv().await.expect("should receive ERROR");
    match reply.command {
        Command::ERROR(text) => assert!(text.contains("K-Lined")),
        other => panic!("expected ERROR, got {other:?}"),
    }
}
