use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Entity, EntityKind, Team};

/// Generates variant-prefixed ids with short random suffixes. Ids are
/// produced once at creation and never reused within a session. The rng
/// state clones with the table, so a cloned simulation spawns identically
/// named entities and stays structurally comparable to the original.
#[derive(Debug, Clone)]
struct IdSource {
    rng: StdRng,
}

impl IdSource {
    fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    fn next(&mut self, prefix: &str) -> String {
        let suffix: String = (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(char::from)
            .collect();
        format!("{prefix}-{suffix}")
    }
}

fn kind_prefix(kind: &EntityKind) -> &'static str {
    match kind {
        EntityKind::Hero { .. } => "hero",
        EntityKind::Creep { .. } => "creep",
        EntityKind::Tower => "tower",
        EntityKind::Core => "core",
        EntityKind::Projectile { .. } => "proj",
    }
}

/// Insertion-ordered entity storage. Iteration order is creation order and
/// stays stable within a tick, which keeps per-tick scans deterministic:
/// identical table state plus an identical dt sequence reproduces identical
/// float results.
#[derive(Debug, Clone)]
pub struct EntityTable {
    entries: Vec<Entity>,
    ids: IdSource,
}

impl PartialEq for EntityTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: IdSource::new(),
        }
    }

    /// Creates an entity with a fresh id and returns the id.
    pub fn create(&mut self, kind: EntityKind, team: Team, x: f32, z: f32, hp: f32) -> String {
        let id = self.ids.next(kind_prefix(&kind));
        self.entries
            .push(Entity::new(id.clone(), kind, team, x, z, hp));
        id
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Removes by id, preserving the insertion order of the remainder.
    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entries.iter_mut()
    }

    /// Wholesale replacement, used when a guest applies a snapshot.
    pub fn replace_all(&mut self, units: Vec<Entity>) {
        self.entries = units;
    }

    /// Owned copy of every record in table order, for snapshot broadcast.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entries.clone()
    }

    pub fn hero(&self, team: Team) -> Option<&Entity> {
        self.entries.iter().find(|e| e.is_hero() && e.team == team)
    }

    pub fn hero_mut(&mut self, team: Team) -> Option<&mut Entity> {
        self.entries
            .iter_mut()
            .find(|e| e.is_hero() && e.team == team)
    }

    pub(crate) fn at(&self, index: usize) -> &Entity {
        &self.entries[index]
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> &mut Entity {
        &mut self.entries[index]
    }

    /// Nearest living non-projectile enemy of `team`, by Euclidean distance.
    /// The comparison is strict, so an exact-distance tie resolves to the
    /// earliest-inserted candidate; under floating point this is accepted
    /// nondeterminism, not something the engine tries to hide.
    pub fn nearest_enemy(&self, team: Team, x: f32, z: f32) -> Option<&Entity> {
        self.nearest_enemy_within(team, x, z, f32::INFINITY)
    }

    /// Same as [`EntityTable::nearest_enemy`], restricted to `range`.
    pub fn nearest_enemy_within(
        &self,
        team: Team,
        x: f32,
        z: f32,
        range: f32,
    ) -> Option<&Entity> {
        let mut best: Option<&Entity> = None;
        let mut best_dist = range;
        for e in &self.entries {
            if e.team == team || !e.is_alive() || e.is_projectile() {
                continue;
            }
            let dist = e.distance_to_point(x, z);
            if dist < best_dist {
                best_dist = dist;
                best = Some(e);
            }
        }
        best
    }
}
