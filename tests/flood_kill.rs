//! spec.md §8: with `flood_limit=10` and `threshold=5`, an 11th `PING`
//! inside the window gets the client disconnected with "Excess flood".

mod common;

use corvid_proto::Command;

use common::TestServer;

#[tokio::test]
async fn eleventh_ping_within_window_triggers_excess_flood() {
    let extra = "flood_limit = 10\nflood_threshold = 5\n";
    let server = TestServer::spawn_with_extra(16674, extra)
        .await
        .expect("server should start");

    let mut client = server.connect("flooder").await.expect("connect");
    client.register().await.expect("registration should succeed");

    // Let the flood window opened by NICK/USER roll over so only the
    // PING burst below counts towards the limit.
    tokio::time::sleep(std::time::Duration::from_secs(6)).await;

    for _ in 0..10 {
        client.send_raw("PING :x").await.expect("send ping");
    }
    client.send_raw("PING :x").await.expect("send eleventh ping");

    let reply = client
        .recv_until(|msg| matches!(&msg.command, Command::ERROR(_)))
        .await
        .expect("should receive ERROR before disconnect");
    let got_excess_flood = reply.iter().any(|m| {
        matches!(&m.command, Command::ERROR(text) if text.contains("Excess flood"))
    });
    assert!(got_excess_flood);
}
