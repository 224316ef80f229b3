//! spec.md §8: a channel ban keeps a matching hostmask out, but a
//! matching exception mask lets it back in.

mod common;

use corvid_proto::Command;

use common::TestServer;

#[tokio::test]
async fn ban_blocks_join_and_except_overrides_it() {
    let server = TestServer::spawn(16672).await.expect("server should start");

    let mut op = server.connect("opuser").await.expect("connect op");
    op.register().await.expect("op registers");
    op.join("#banned").await.expect("op joins, becomes chanop");
    op.recv_until(|msg| matches!(&msg.command, Command::Response(resp, _) if resp.code() == 366))
        .await
        .expect("op sees end of names");

    op.send_raw("MODE #banned +b *!*@127.0.0.1")
        .await
        .expect("set ban");

    let mut mallory = server.connect("mallory").await.expect("connect mallory");
    mallory.register().await.expect("mallory registers");
    mallory.join("#banned").await.expect("mallory attempts to join");
    let replies = mallory
        .recv_until(|msg| matches!(&msg.command, Command::Response(resp, _) if resp.code() == 474))
        .await
        .expect("mallory is banned");
    assert!(replies
        .iter()
        .any(|m| matches!(&m.command, Command::Response(resp, _) if resp.code() == 474)));

    op.send_raw("MODE #banned +e *!*@127.0.0.1")
        .await
        .expect("set exception");

    let mut mallory2 = server.connect("mallory").await.expect("reconnect mallory");
    mallory2.register().await.expect("mallory registers again");
    mallory2.join("#banned").await.expect("mallory rejoins");
    let ok = mallory2
        .recv_until(|msg| matches!(&msg.command, Command::Response(resp, _) if resp.code() == 366))
        .await
        .expect("mallory gets past the ban via the exception");
    assert!(ok
        .iter()
        .any(|m| matches!(&m.command, Command::Response(resp, _) if resp.code() == 366)));
}
