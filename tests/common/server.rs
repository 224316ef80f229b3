//! Spawns and manages `corvidd` instances for integration testing.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;

use tokio::time::sleep;

/// A running `corvidd` test instance, killed and cleaned up on drop.
pub struct TestServer {
    child: Child,
    port: u16,
    data_dir: PathBuf,
}

impl TestServer {
    /// Spawn a server with a minimal config plus whatever extra TOML
    /// fragment the caller supplies (e.g. `xline_seed` or `flood_limit`
    /// overrides for a specific scenario).
    pub async fn spawn_with_extra(port: u16, extra_toml: &str) -> anyhow::Result<Self> {
        let data_dir = std::env::temp_dir().join(format!("corvidd-test-{port}"));
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join("config.toml");
        let config_content = format!(
            r#"
server_name = "test.corvid"
network_name = "TestNet"
bind = ["127.0.0.1:{port}"]
reg_timeout = 10

{extra_toml}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let cargo_manifest_dir = env!("CARGO_MANIFEST_DIR");
        let binary_path = PathBuf::from(cargo_manifest_dir).join("target/debug/corvidd");

        let child = Command::new(&binary_path)
            .arg(config_path.to_str().unwrap())
            .spawn()?;

        let server = Self { child, port, data_dir };
        server.wait_until_ready().await?;
        Ok(server)
    }

    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        Self::spawn_with_extra(port, "").await
    }

    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..30 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port)).await.is_ok() {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("corvidd failed to start within 3 seconds")
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}
