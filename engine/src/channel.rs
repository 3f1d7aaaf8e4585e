use log::{error, info, warn};
use shared::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;

/// Large enough for a full-table snapshot in one datagram.
const RECV_BUFFER: usize = 16384;

/// Best-effort JSON datagram channel to the single remote peer.
///
/// A background tokio runtime owns the socket and runs two tasks: a
/// receiver that decodes datagrams and queues them, and a sender that
/// drains the outbound queue. The frame loop only ever touches the two
/// unbounded queues, so inbound messages are applied at frame boundaries
/// and a send can never block a tick. Malformed datagrams are logged and
/// dropped without reaching the simulation.
///
/// The host side binds and learns the guest's address from the first
/// datagram it receives; the guest binds an ephemeral port and targets the
/// host. Until the peer is known, outbound messages are discarded.
pub struct PeerChannel {
    outbound: UnboundedSender<Message>,
    inbound: UnboundedReceiver<Message>,
    local_addr: SocketAddr,
}

impl PeerChannel {
    /// Host side: bind `bind` and wait for the guest to show up.
    pub fn host(bind: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::open(bind, None)
    }

    /// Guest side: bind an ephemeral port and target the host address.
    pub fn connect(host: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let peer: SocketAddr = host.parse()?;
        Self::open("0.0.0.0:0", Some(peer))
    }

    fn open(bind: &str, peer: Option<SocketAddr>) -> Result<Self, Box<dyn std::error::Error>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let socket = runtime.block_on(UdpSocket::bind(bind))?;
        let local_addr = socket.local_addr()?;
        info!("peer channel bound on {}", local_addr);

        let socket = Arc::new(socket);
        let peer = Arc::new(RwLock::new(peer));
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<Message>();

        let recv_socket = Arc::clone(&socket);
        let recv_peer = Arc::clone(&peer);
        let send_socket = socket;
        let send_peer = peer;

        std::thread::spawn(move || {
            runtime.block_on(async move {
                let receiver = async {
                    let mut buffer = [0u8; RECV_BUFFER];
                    loop {
                        match recv_socket.recv_from(&mut buffer).await {
                            Ok((len, addr)) => {
                                {
                                    let mut known = recv_peer.write().await;
                                    if known.is_none() {
                                        info!("peer connected from {}", addr);
                                    }
                                    *known = Some(addr);
                                }
                                let raw = String::from_utf8_lossy(&buffer[..len]);
                                match Message::decode(&raw) {
                                    Ok(msg) => {
                                        if inbound_tx.send(msg).is_err() {
                                            break; // channel owner is gone
                                        }
                                    }
                                    Err(e) => {
                                        warn!("dropping malformed message from {}: {}", addr, e)
                                    }
                                }
                            }
                            Err(e) => {
                                error!("recv error: {}", e);
                                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                            }
                        }
                    }
                };

                let sender = async {
                    while let Some(msg) = outbound_rx.recv().await {
                        let target = *send_peer.read().await;
                        let Some(addr) = target else {
                            continue; // no peer yet, best effort
                        };
                        match msg.encode() {
                            Ok(text) => {
                                if let Err(e) = send_socket.send_to(text.as_bytes(), addr).await {
                                    error!("send to {} failed: {}", addr, e);
                                }
                            }
                            Err(e) => error!("failed to encode {} message: {}", msg.label(), e),
                        }
                    }
                };

                tokio::join!(receiver, sender);
            });
        });

        Ok(PeerChannel {
            outbound: outbound_tx,
            inbound: inbound_rx,
            local_addr,
        })
    }

    /// Queues a message for the peer. Best effort: no backpressure, no
    /// delivery guarantee surfaced to the caller.
    pub fn send(&self, msg: Message) {
        if self.outbound.send(msg).is_err() {
            error!("network sender task is gone");
        }
    }

    /// Drains everything that arrived since the previous frame boundary.
    pub fn drain(&mut self) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.inbound.try_recv() {
            messages.push(msg);
        }
        messages
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    fn drain_until(channel: &mut PeerChannel, deadline: Duration) -> Vec<Message> {
        let start = Instant::now();
        loop {
            let messages = channel.drain();
            if !messages.is_empty() || start.elapsed() > deadline {
                return messages;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn guest_to_host_roundtrip_over_loopback() {
        let mut host = PeerChannel::host("127.0.0.1:0").unwrap();
        let host_addr = format!("127.0.0.1:{}", host.local_addr().port());
        let mut guest = PeerChannel::connect(&host_addr).unwrap();

        let hello = Message::Input {
            mx: 1.0,
            mz: 0.0,
            cast: None,
            ax: 1.0,
            az: 0.0,
            lock: false,
        };
        guest.send(hello.clone());

        let received = drain_until(&mut host, Duration::from_secs(2));
        assert_eq!(received, vec![hello]);

        // host learned the guest's address from that datagram
        let reply = Message::State {
            t: 1.0,
            units: vec![],
        };
        host.send(reply.clone());
        let received = drain_until(&mut guest, Duration::from_secs(2));
        assert_eq!(received, vec![reply]);
    }

    #[test]
    fn sends_before_a_peer_is_known_are_discarded() {
        let mut host = PeerChannel::host("127.0.0.1:0").unwrap();
        host.send(Message::State {
            t: 0.0,
            units: vec![],
        });
        thread::sleep(Duration::from_millis(50));
        assert!(host.drain().is_empty());
    }
}
