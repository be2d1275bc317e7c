use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use tracing::{debug, info, warn};

use crate::registry::ClientRegistry;
use crate::session::{Flow, Session, SessionHandle};
use crate::users::UserStore;

/// Accept loop: one task per connection, each bound to the shared registry
/// and user store.
pub async fn run_server(
    listener: TcpListener,
    registry: Arc<ClientRegistry>,
    users: Arc<UserStore>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!(peer = %addr, "accepted connection");
                let registry = Arc::clone(&registry);
                let users = Arc::clone(&users);
                tokio::spawn(async move {
                    handle_connection(stream, registry, users).await;
                });
            }
            Err(e) => {
                warn!(error = %e, "failed to accept connection");
            }
        }
    }
}

/// Drives one connection from accept to close.
///
/// The stream is split: a dedicated writer task drains the session's
/// outbound channel into the write half, so no two deliveries ever
/// interleave on the socket, while this task runs the blocking line-read
/// loop. Registry cleanup runs on every exit path, normal or not.
async fn handle_connection(
    stream: TcpStream,
    registry: Arc<ClientRegistry>,
    users: Arc<UserStore>,
) {
    let (read_half, mut write_half) = stream.into_split();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let handle = Arc::new(SessionHandle::new(tx));
    let session_id = handle.id().to_string();

    // Register the session before reading anything, so it is visible to
    // broadcasts from the very first command.
    registry.add(Arc::clone(&handle));

    // Forward outbound lines from the session channel to the socket.
    let writer_id = session_id.clone();
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = write_half.write_all(line.as_bytes()).await {
                warn!(session = %writer_id, error = %e, "write failed");
                break;
            }
        }
        debug!(session = %writer_id, "send loop closed");
    });

    let session = Session::new(Arc::clone(&handle), Arc::clone(&registry), users);
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if session.handle_line(&line) == Flow::Close {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(session = %session_id, error = %e, "read failed");
                break;
            }
        }
    }

    // Idempotent: the logoff/deregister paths may have removed us already.
    registry.remove(&session_id);
    info!(session = %session_id, "connection closed");
}
