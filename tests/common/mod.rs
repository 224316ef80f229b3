//! Shared integration-test scaffolding: spawn a real `corvidd` subprocess
//! and talk to it over a loopback TCP pair, mirroring the teacher's own
//! `tests/common` harness.

pub mod client;
pub mod server;

pub use client::TestClient;
pub use server::TestServer;
