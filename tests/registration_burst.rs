//! spec.md §8: a burst of clients registering concurrently all reach
//! RPL_WELCOME with distinct nicknames.

mod common;

use common::TestServer;

#[tokio::test]
async fn concurrent_registrations_all_succeed() {
    let server = TestServer::spawn(16670).await.expect("server should start");

    let mut handles = Vec::new();
    for i in 0..8 {
        let addr = server.address();
        handles.push(tokio::spawn(async move {
            let mut client = common::TestClient::connect(&addr, &format!("burst{i}"))
                .await
                .expect("connect");
            client.register().await.expect("registration should succeed");
        }));
    }

    for handle in handles {
        handle.await.expect("task should not panic");
    }
}
