//! WebSocket transport adapter bridging sockets onto the coordinator

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::coordinator::AuctionCoordinator;

/// Accept loop: upgrades each TCP stream to a WebSocket and hands it
/// to the coordinator as a pair of (inbound text frames, outbound
/// channel). All auction logic lives behind the coordinator; this
/// layer only moves frames.
pub struct AuctionServer {
    listener: TcpListener,
    coordinator: Arc<AuctionCoordinator>,
}

impl AuctionServer {
    /// Binds the listening socket. Serving starts with [`run`].
    ///
    /// [`run`]: AuctionServer::run
    pub async fn bind(
        addr: &str,
        coordinator: Arc<AuctionCoordinator>,
    ) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        info!("Auction server listening on {}", addr);

        Ok(Self {
            listener,
            coordinator,
        })
    }

    /// Actual bound address, useful when binding to port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Serves connections until the task is cancelled or the listener
    /// fails.
    pub async fn run(&self) -> Result<(), std::io::Error> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let coordinator = Arc::clone(&self.coordinator);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, coordinator).await {
                    warn!("Connection from {} ended with error: {}", peer, e);
                }
            });
        }
    }
}

/// Pumps one WebSocket until it closes.
///
/// A writer task drains the registry channel into the socket sink, so
/// broadcasts never block on a slow peer; the read loop feeds text
/// frames to the coordinator and everything else is ignored
/// (ping/pong is answered by the protocol library).
async fn handle_connection(
    stream: TcpStream,
    coordinator: Arc<AuctionCoordinator>,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sink, mut ws_stream) = ws.split();

    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        while let Some(frame) = receiver.recv().await {
            if ws_sink.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    let id = coordinator.handle_connect(sender).await;

    while let Some(message) = ws_stream.next().await {
        match message {
            Ok(Message::Text(text)) => coordinator.handle_bid(id, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Connection {} read error: {}", id, e);
                break;
            }
        }
    }

    coordinator.handle_disconnect(id).await;
    writer.abort();
    Ok(())
}
