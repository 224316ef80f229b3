//! A bare-bones IRC test client built only on `corvid_proto`'s wire types,
//! since `corvid-ircd` ships a binary with no library target to link
//! against directly.

#![allow(dead_code)]

use std::time::Duration;

use corvid_proto::{Command, Message};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        let msg = Message::from(cmd);
        self.send_raw(&msg.to_string()).await
    }

    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(10)).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        line.trim_end()
            .parse::<Message>()
            .map_err(|e| anyhow::anyhow!("parse error: {e}"))
    }

    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// NICK + USER, then wait for RPL_WELCOME (001).
    pub async fn register(&mut self) -> anyhow::Result<()> {
        self.send(Command::NICK(self.nick.clone())).await?;
        self.send(Command::USER(
            self.nick.clone(),
            "0".to_string(),
            format!("Test User {}", self.nick),
        ))
        .await?;

        let messages = self
            .recv_until(|msg| matches!(&msg.command, Command::Response(resp, _) if resp.code() == 1))
            .await?;

        if messages
            .iter()
            .any(|msg| matches!(&msg.command, Command::Response(resp, _) if resp.code() == 1))
        {
            Ok(())
        } else {
            anyhow::bail!("registration failed: no RPL_WELCOME received")
        }
    }

    pub async fn join(&mut self, channel: &str) -> anyhow::Result<()> {
        self.send(Command::JOIN(channel.to_string(), None, None)).await
    }

    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send(Command::PRIVMSG(target.to_string(), text.to_string())).await
    }

    pub async fn quit(&mut self, reason: Option<String>) -> anyhow::Result<()> {
        self.send(Command::QUIT(reason)).await
    }
}
