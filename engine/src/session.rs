use log::{info, warn};
use shared::config::{HERO_SPEED, SNAPSHOT_INTERVAL};
use shared::{InputFrame, Message, Team, Vec2};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::channel::PeerChannel;
use crate::clock::FrameClock;
use crate::sim::Simulation;
use crate::skills::resolve_aim;
use crate::table::EntityTable;

/// Silence threshold after which a previously seen peer is reported lost.
/// An authoritative simulation keeps running regardless; a guest simply
/// stops receiving snapshots and freezes visually.
const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// The three mutually exclusive session roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// No networking; this process is authoritative for both teams.
    Local,
    /// Authoritative; also applies the guest's relayed input to team 2.
    Host,
    /// Pure mirror of the host's state; sends intent instead of acting.
    Guest,
}

/// Observable link state for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Local role, no channel at all.
    Offline,
    /// Channel up, nothing heard from a peer yet.
    Waiting,
    Connected,
    /// A peer was seen but has gone silent.
    Lost,
}

/// One running session: a role, the simulation (authoritative roles) or the
/// mirrored table (guest), and the peer channel if networked.
///
/// [`Session::frame`] is called once per rendered frame and performs the
/// whole per-frame contract: drain the network at the frame boundary, apply
/// operator input, tick the simulation, and broadcast snapshots on the
/// fixed cadence.
pub struct Session {
    role: Role,
    sim: Simulation,
    channel: Option<PeerChannel>,
    clock: FrameClock,
    snapshot_accum: f32,
    last_peer_msg: Option<Instant>,
}

impl Session {
    /// Starts a local match immediately; there is nothing to wait for.
    pub fn local() -> Self {
        let mut session = Self::with_role(Role::Local, None);
        session.sim.reset();
        session
    }

    /// Binds the host side of the peer channel and starts simulating right
    /// away; the guest's hero idles until input messages arrive. A bind
    /// failure is fatal to this attempt only; the caller keeps its idle
    /// state and may retry with a fresh call.
    pub fn host(bind: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let channel = PeerChannel::host(bind)?;
        let mut session = Self::with_role(Role::Host, Some(channel));
        session.sim.reset();
        Ok(session)
    }

    /// Joins a host as the mirroring guest. The table stays empty until the
    /// first snapshot lands.
    pub fn join(host: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let channel = PeerChannel::connect(host)?;
        Ok(Self::with_role(Role::Guest, Some(channel)))
    }

    fn with_role(role: Role, channel: Option<PeerChannel>) -> Self {
        info!("session starting as {:?}", role);
        Self {
            role,
            sim: Simulation::new(),
            channel,
            clock: FrameClock::new(),
            snapshot_accum: 0.0,
            last_peer_msg: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The team this operator controls: team 2 as guest, team 1 otherwise.
    pub fn my_team(&self) -> Team {
        match self.role {
            Role::Guest => Team::Two,
            _ => Team::One,
        }
    }

    pub fn is_authoritative(&self) -> bool {
        !matches!(self.role, Role::Guest)
    }

    /// Read-only view for the renderer.
    pub fn units(&self) -> &EntityTable {
        &self.sim.units
    }

    /// Simulation seconds; on a guest this is the host time carried by the
    /// latest snapshot.
    pub fn time(&self) -> f32 {
        self.sim.time
    }

    pub fn over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn winner(&self) -> Option<Team> {
        if self.is_authoritative() {
            self.sim.winner
        } else {
            Simulation::outcome_of(&self.sim.units)
        }
    }

    pub fn status(&self) -> LinkStatus {
        if self.channel.is_none() {
            return LinkStatus::Offline;
        }
        match self.last_peer_msg {
            None => LinkStatus::Waiting,
            Some(seen) if seen.elapsed() > PEER_TIMEOUT => LinkStatus::Lost,
            Some(_) => LinkStatus::Connected,
        }
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.channel.as_ref().map(|c| c.local_addr())
    }

    /// Remaining cooldown seconds for this operator's hero, ordered A, Q, E
    /// to match the skill pad layout.
    pub fn cooldowns(&self) -> [f32; 3] {
        let now = self.sim.time;
        match self.sim.units.hero(self.my_team()).map(|h| &h.kind) {
            Some(shared::EntityKind::Hero {
                q_ready,
                e_ready,
                a_ready,
            }) => [
                (a_ready - now).max(0.0),
                (q_ready - now).max(0.0),
                (e_ready - now).max(0.0),
            ],
            _ => [0.0; 3],
        }
    }

    /// Operator command: re-seed the match. Explicitly ignored on a guest;
    /// only an authoritative role may reset.
    pub fn reset(&mut self) {
        if !self.is_authoritative() {
            info!("reset ignored: guest is not authoritative");
            return;
        }
        self.sim.reset();
        self.snapshot_accum = 0.0;
    }

    /// Operator command: spawn a creep wave now. Ignored on a guest.
    pub fn force_spawn_wave(&mut self) {
        if !self.is_authoritative() {
            info!("forced wave ignored: guest is not authoritative");
            return;
        }
        self.sim.spawn_wave();
    }

    /// Advances one rendered frame.
    pub fn frame(&mut self, input: &InputFrame) {
        self.drain_network();

        let dt = self.clock.tick();
        let team = self.my_team();
        let aim = resolve_aim(&self.sim.units, team, input);

        match self.role {
            Role::Local | Role::Host => {
                self.apply_movement(team, input.mx, input.mz);
                if let Some(skill) = input.cast {
                    self.sim.cast_skill(team, skill, aim);
                }
                let was_over = self.sim.over;
                self.sim.step(dt);
                if self.role == Role::Host {
                    self.broadcast(dt, was_over);
                }
            }
            Role::Guest => {
                if let Some(channel) = &self.channel {
                    channel.send(Message::Input {
                        mx: input.mx,
                        mz: input.mz,
                        cast: input.cast,
                        ax: aim.x,
                        az: aim.z,
                        lock: input.lock_on,
                    });
                }
            }
        }
    }

    /// Applies one inbound protocol message for this session's role. A
    /// message that makes no sense for the role is dropped.
    pub fn apply_message(&mut self, msg: Message) {
        match (self.role, msg) {
            (Role::Host, Message::Input { mx, mz, cast, ax, az, .. }) => {
                self.apply_movement(Team::Two, mx, mz);
                if let Some(skill) = cast {
                    // the guest-declared aim is trusted as-is; only the
                    // cooldown gate stands between a spamming guest and
                    // the simulation
                    self.sim.cast_skill(Team::Two, skill, Vec2::dir(ax, az));
                }
            }
            (Role::Guest, Message::State { t, units }) => {
                self.sim.units.replace_all(units);
                self.sim.time = t;
            }
            (role, msg) => {
                warn!("dropping {} message, unexpected for {:?}", msg.label(), role)
            }
        }
    }

    /// Normalizes an intent vector into a full-speed hero velocity; the
    /// zero vector stops the hero. Movement lands on the next tick.
    fn apply_movement(&mut self, team: Team, mx: f32, mz: f32) {
        if let Some(hero) = self.sim.units.hero_mut(team) {
            let v = Vec2::dir(mx, mz).scaled(HERO_SPEED);
            hero.vx = v.x;
            hero.vz = v.z;
        }
    }

    fn drain_network(&mut self) {
        let messages = match &mut self.channel {
            Some(channel) => channel.drain(),
            None => return,
        };
        if !messages.is_empty() {
            self.last_peer_msg = Some(Instant::now());
        }
        for msg in messages {
            self.apply_message(msg);
        }
    }

    /// Snapshot cadence: a 12 Hz accumulator over simulated time, plus one
    /// final flush on the tick the match ends so the mirror always reaches
    /// the closing state.
    fn broadcast(&mut self, dt: f32, was_over: bool) {
        if !was_over {
            self.snapshot_accum += dt;
        }
        let just_ended = self.sim.over && !was_over;
        if just_ended || self.snapshot_accum >= SNAPSHOT_INTERVAL {
            self.snapshot_accum = 0.0;
            if let Some(channel) = &self.channel {
                channel.send(Message::State {
                    t: self.sim.time,
                    units: self.sim.units.snapshot(),
                });
            }
        }
    }
}
