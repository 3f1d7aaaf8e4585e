//! Gameplay tunables. Distances are world units on the x/z plane, times are
//! seconds of simulation time.

pub const MAP_W: f32 = 2000.0;
pub const MAP_H: f32 = 1200.0;

/// The single lane runs horizontally across the map at this depth.
pub const LANE_Z: f32 = 600.0;
/// Heroes may stray this far above/below the lane center.
pub const LANE_HALF: f32 = 60.0;

/// Maximum simulation step. Bounds work after stalls (backgrounded window,
/// debugger pause) and keeps projectiles from tunneling through collision
/// radii on a huge dt.
pub const DT_CLAMP: f32 = 1.0 / 20.0;

/// Host -> guest snapshot cadence.
pub const SNAPSHOT_INTERVAL: f32 = 1.0 / 12.0;

pub const HERO_HP: f32 = 700.0;
pub const HERO_SPEED: f32 = 220.0;
pub const HERO_RADIUS: f32 = 14.0;
/// Heroes spawn this far from their own map edge.
pub const HERO_SPAWN_X: f32 = 300.0;

/// Shape shared by the two projectile skills (Q nuke and A basic attack).
#[derive(Debug, Clone, Copy)]
pub struct NukeSpec {
    pub damage: f32,
    pub speed: f32,
    pub range: f32,
    pub cooldown: f32,
}

pub const SKILL_Q: NukeSpec = NukeSpec {
    damage: 80.0,
    speed: 640.0,
    range: 900.0,
    cooldown: 6.0,
};

pub const SKILL_A: NukeSpec = NukeSpec {
    damage: 40.0,
    speed: 700.0,
    range: 600.0,
    cooldown: 0.6,
};

pub const DASH_DISTANCE: f32 = 220.0;
pub const DASH_COOLDOWN: f32 = 10.0;

pub const CREEP_HP: f32 = 220.0;
pub const CREEP_SPEED: f32 = 120.0;
pub const CREEP_DAMAGE: f32 = 12.0;
pub const CREEP_RADIUS: f32 = 10.0;
/// A creep bites the nearest enemy inside this radius every tick it stays
/// in range; there is no swing cooldown.
pub const CREEP_AGGRO_RADIUS: f32 = 22.0;
/// Stealth-reveal radius carried by wave-spawned creeps, consumed by the
/// minimap fog-of-war.
pub const CREEP_REVEAL_RADIUS: f32 = 80.0;

pub const WAVE_SIZE: u32 = 3;
pub const WAVE_INTERVAL: f32 = 15.0;
/// The first wave marches shortly after a reset.
pub const FIRST_WAVE_DELAY: f32 = 2.0;
/// Team 1 creeps spawn at x = WAVE_SPAWN_X + i * WAVE_SPACING; team 2 is
/// mirrored across the map.
pub const WAVE_SPAWN_X: f32 = 360.0;
pub const WAVE_SPACING: f32 = 16.0;

pub const TOWER_HP: f32 = 900.0;
pub const TOWER_RANGE: f32 = 260.0;
pub const TOWER_DAMAGE: f32 = 18.0;
/// Shared fire accumulator interval; the overshoot past a crossing is
/// discarded, not carried over.
pub const TOWER_FIRE_INTERVAL: f32 = 0.75;
pub const TOWER_RADIUS: f32 = 18.0;
pub const TOWER_X: f32 = 600.0;

pub const CORE_HP: f32 = 1500.0;
pub const CORE_RADIUS: f32 = 26.0;
pub const CORE_X: f32 = 220.0;
