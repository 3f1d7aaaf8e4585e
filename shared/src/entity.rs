use serde::{Deserialize, Serialize};

use crate::config::{CORE_RADIUS, CREEP_RADIUS, HERO_RADIUS, TOWER_RADIUS};

/// One of the two sides of a match. Serialized as the bare numbers 1 and 2
/// on the wire; anything else is rejected at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub fn enemy(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }

    /// Lane advance direction: team 1 pushes toward +x, team 2 toward -x.
    pub fn lane_dir(self) -> f32 {
        match self {
            Team::One => 1.0,
            Team::Two => -1.0,
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> u8 {
        team.number()
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Team::One),
            2 => Ok(Team::Two),
            other => Err(format!("invalid team {other}, expected 1 or 2")),
        }
    }
}

/// Variant payload of an entity. The set is closed; every per-tick rule
/// matches exhaustively over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityKind {
    /// Next-ready timestamps for the three skills, compared against the
    /// simulation's running time.
    Hero {
        q_ready: f32,
        e_ready: f32,
        a_ready: f32,
    },
    Creep {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reveal_radius: Option<f32>,
    },
    Tower,
    Core,
    /// Remaining travel range, flat impact damage, and the casting hero's id.
    Projectile {
        range: f32,
        damage: f32,
        owner: String,
    },
}

/// The one aggregate the simulation owns. Positions and velocities live on
/// the x/z plane; hp is kept within `[0, max_hp]` by [`Entity::apply_damage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub team: Team,
    pub x: f32,
    pub z: f32,
    pub vx: f32,
    pub vz: f32,
    pub hp: f32,
    pub max_hp: f32,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: String, kind: EntityKind, team: Team, x: f32, z: f32, hp: f32) -> Self {
        Self {
            id,
            team,
            x,
            z,
            vx: 0.0,
            vz: 0.0,
            hp,
            max_hp: hp,
            kind,
        }
    }

    /// Dead entities stay in the table but are skipped as targets and take
    /// no further actions.
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn is_hero(&self) -> bool {
        matches!(self.kind, EntityKind::Hero { .. })
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile { .. })
    }

    /// Collision radius used for projectile impact tests. Projectiles are
    /// never impact targets themselves.
    pub fn radius(&self) -> f32 {
        match self.kind {
            EntityKind::Hero { .. } => HERO_RADIUS,
            EntityKind::Creep { .. } => CREEP_RADIUS,
            EntityKind::Tower => TOWER_RADIUS,
            EntityKind::Core => CORE_RADIUS,
            EntityKind::Projectile { .. } => 0.0,
        }
    }

    pub fn apply_damage(&mut self, damage: f32) {
        self.hp = (self.hp - damage).clamp(0.0, self.max_hp);
    }

    pub fn distance_to_point(&self, x: f32, z: f32) -> f32 {
        let (dx, dz) = (x - self.x, z - self.z);
        (dx * dx + dz * dz).sqrt()
    }
}
