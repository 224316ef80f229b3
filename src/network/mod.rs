//! TCP listener and per-connection I/O pump.
//!
//! spec.md §5 requires that no handler ever blocks on I/O and that all
//! protocol state lives behind the single core loop. Grounded in the
//! teacher's `network::Gateway`/`Connection` split, but collapsed per
//! `SPEC_FULL.md` §1/§7: a connection task here only frames/deframes
//! lines and shuttles them through an `mpsc` channel. It never touches
//! `Server` — that happens exclusively in `state::run_event_loop`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::{EventSender, LoopEvent};

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> String {
    format!("u{}", NEXT_UID.fetch_add(1, Ordering::Relaxed))
}

/// A single read's worth of socket data, per spec.md's line codec.
const READ_CHUNK: usize = 16 * 1024;
/// A line that reaches this many bytes without a terminator is forced
/// to completion rather than left to grow recvQ unbounded.
const MAX_LINE_LEN: usize = 512;

/// Bind every configured address and accept connections forever. Returns
/// once every listener task has exited (normally only on bind failure,
/// since the accept loops themselves never return).
pub async fn run_listeners(
    addrs: &[SocketAddr],
    events: EventSender,
    recvq_limit: usize,
) -> std::io::Result<()> {
    let mut tasks = Vec::with_capacity(addrs.len());
    for &addr in addrs {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "listening");
        let events = events.clone();
        tasks.push(tokio::spawn(accept_loop(listener, events, recvq_limit)));
    }
    for task in tasks {
        let _ = task.await;
    }
    Ok(())
}

async fn accept_loop(listener: TcpListener, events: EventSender, recvq_limit: usize) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let uid = next_uid();
                let events = events.clone();
                tokio::spawn(handle_connection(uid, stream, addr, events, recvq_limit));
            }
            Err(err) => warn!(%err, "accept failed"),
        }
    }
}

/// Read lines from `stream` and forward them as `LoopEvent::Line`, while a
/// paired task drains the outbox `mpsc` channel the core loop writes to.
/// Neither half parses a single byte of IRC grammar.
async fn handle_connection(
    uid: String,
    stream: TcpStream,
    addr: SocketAddr,
    events: EventSender,
    recvq_limit: usize,
) {
    let _ = stream.set_nodelay(true);
    let (mut read_half, mut write_half) = stream.into_split();

    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<String>();
    if events
        .send(LoopEvent::Accept {
            uid: uid.clone(),
            addr: addr.ip(),
            outbox: outbox_tx,
        })
        .is_err()
    {
        return;
    }

    let writer_uid = uid.clone();
    let writer_task = tokio::spawn(async move {
        while let Some(line) = outbox_rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
        debug!(uid = %writer_uid, "writer pump exiting");
    });

    let mut recvq = BytesMut::with_capacity(4096);
    let mut chunk = [0u8; READ_CHUNK];
    'outer: loop {
        let n = match read_half.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                debug!(uid = %uid, %err, "read error");
                break;
            }
        };
        recvq.extend_from_slice(&chunk[..n]);

        if recvq.len() > recvq_limit {
            warn!(uid = %uid, limit = recvq_limit, "recvq exceeded");
            break;
        }

        loop {
            let mut line = match recvq.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    let mut raw = recvq.split_to(pos + 1);
                    raw.truncate(raw.len() - 1); // drop the '\n'
                    if raw.last() == Some(&b'\r') {
                        raw.truncate(raw.len() - 1);
                    }
                    raw
                }
                // Force completion: the first 510 bytes stand as the
                // line, per spec.md's line-codec truncation rule.
                None if recvq.len() >= MAX_LINE_LEN => recvq.split_to(MAX_LINE_LEN - 2),
                None => break,
            };

            for byte in line.iter_mut() {
                if *byte == 0x00 || *byte == 0x07 {
                    *byte = b' ';
                }
            }
            if line.is_empty() {
                continue;
            }
            let text = String::from_utf8_lossy(&line).into_owned();
            if events
                .send(LoopEvent::Line { uid: uid.clone(), line: text })
                .is_err()
            {
                break 'outer;
            }
        }
    }

    let _ = events.send(LoopEvent::Disconnect { uid: uid.clone() });
    writer_task.abort();
    info!(uid = %uid, %addr, "connection closed");
}
