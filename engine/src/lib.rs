//! # Lane-Combat Engine
//!
//! The authoritative simulation and its host/guest synchronization layer.
//!
//! A [`Simulation`] owns the entity table and advances it one deterministic
//! tick per rendered frame: hero movement, wave spawning, projectile flight
//! and impact, creep march and melee, tower fire, and the win check, always
//! in that order. A [`Session`] wraps the simulation in one of three roles:
//!
//! - `local` — no networking, one process simulates both teams;
//! - `host` — authoritative; applies the remote guest's relayed input to
//!   team 2's hero and broadcasts full-table snapshots at a fixed cadence;
//! - `guest` — a pure mirror; sends intent, replaces its table wholesale
//!   with every snapshot it receives, and never simulates.
//!
//! Networking runs on a background tokio runtime ([`channel::PeerChannel`]);
//! inbound messages queue on an unbounded channel and are drained at the
//! next frame boundary, so the table is never touched mid-tick.

pub mod channel;
pub mod clock;
pub mod session;
pub mod sim;
pub mod skills;
pub mod table;

pub use channel::PeerChannel;
pub use clock::FrameClock;
pub use session::{LinkStatus, Role, Session};
pub use sim::Simulation;
pub use table::EntityTable;
