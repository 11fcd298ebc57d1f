//! Connection membership tracking and broadcast fan-out
//!
//! This module manages the set of currently open client streams:
//! - Registration and removal over the connection lifecycle
//! - Unicast delivery for the per-connection init snapshot
//! - Broadcast delivery with per-recipient failure isolation
//!
//! The registry holds no sockets. Each connection is represented by
//! the sending half of an unbounded channel whose receiver is drained
//! by that connection's writer task, so every operation here is a
//! non-blocking channel push and safe to run while the caller holds
//! other locks.

use std::collections::HashMap;

use log::{info, warn};
use tokio::sync::mpsc::UnboundedSender;

/// A single open client stream: an opaque id plus the channel feeding
/// its socket writer task. A failed send means the writer task hung
/// up, which is how connection death surfaces here.
#[derive(Debug)]
pub struct Connection {
    pub id: u32,
    sender: UnboundedSender<String>,
}

impl Connection {
    fn new(id: u32, sender: UnboundedSender<String>) -> Self {
        Self { id, sender }
    }

    /// Queues one outbound frame. Returns false when the peer is gone.
    fn send(&self, frame: &str) -> bool {
        self.sender.send(frame.to_string()).is_ok()
    }
}

/// Membership set of open connections.
///
/// The coordinator wraps the registry in a lock; mutation and
/// broadcast iteration are serialized there. Connection ids are
/// assigned monotonically starting from 1 and never reused.
pub struct ConnectionRegistry {
    connections: HashMap<u32, Connection>,
    next_id: u32,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers a connection and hands back its id.
    pub fn add(&mut self, sender: UnboundedSender<String>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        self.connections.insert(id, Connection::new(id, sender));
        info!("Connection {} registered ({} open)", id, self.connections.len());
        id
    }

    /// Deregisters on disconnect. Returns false when already gone,
    /// which happens when a failed send removed it first.
    pub fn remove(&mut self, id: u32) -> bool {
        if self.connections.remove(&id).is_some() {
            info!("Connection {} removed ({} open)", id, self.connections.len());
            true
        } else {
            false
        }
    }

    /// Unicast, used for init snapshots and rejection messages. A
    /// failed send drops the connection from the registry.
    pub fn send_to(&mut self, id: u32, frame: &str) -> bool {
        match self.connections.get(&id) {
            Some(connection) => {
                if connection.send(frame) {
                    true
                } else {
                    warn!("Dropping connection {}: send failed", id);
                    self.connections.remove(&id);
                    false
                }
            }
            None => false,
        }
    }

    /// Delivers a frame to every open connection. Dead peers are
    /// removed as they are found; delivery to the rest continues.
    /// Returns the number of connections reached.
    pub fn broadcast(&mut self, frame: &str) -> usize {
        let mut dead = Vec::new();
        let mut delivered = 0;

        for (id, connection) in &self.connections {
            if connection.send(frame) {
                delivered += 1;
            } else {
                dead.push(*id);
            }
        }

        for id in dead {
            warn!("Dropping connection {}: send failed during broadcast", id);
            self.connections.remove(&id);
        }

        delivered
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
