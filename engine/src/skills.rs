use log::debug;
use shared::config::{DASH_COOLDOWN, DASH_DISTANCE, NukeSpec, SKILL_A, SKILL_Q};
use shared::{EntityKind, InputFrame, SkillKind, Team, Vec2};

use crate::sim::{clamp_hero, Simulation};
use crate::table::EntityTable;

impl Simulation {
    /// Attempts a cast for `team`'s hero. A request arriving before the
    /// skill's next-ready time is silently dropped: no state change, no
    /// cooldown reset, nothing surfaced to the caller.
    pub fn cast_skill(&mut self, team: Team, skill: SkillKind, aim: Vec2) {
        let now = self.time;
        let Some(hero) = self.units.hero(team) else {
            return;
        };
        if !hero.is_alive() {
            return;
        }
        let EntityKind::Hero {
            q_ready,
            e_ready,
            a_ready,
        } = &hero.kind
        else {
            return;
        };
        let ready_at = match skill {
            SkillKind::Q => *q_ready,
            SkillKind::E => *e_ready,
            SkillKind::A => *a_ready,
        };
        if now < ready_at {
            return;
        }
        let (hx, hz, owner) = (hero.x, hero.z, hero.id.clone());

        match skill {
            SkillKind::Q => {
                self.set_ready(team, skill, now + SKILL_Q.cooldown);
                self.launch_projectile(team, hx, hz, owner, aim, &SKILL_Q);
            }
            SkillKind::E => {
                self.set_ready(team, skill, now + DASH_COOLDOWN);
                if let Some(hero) = self.units.hero_mut(team) {
                    hero.x += aim.x * DASH_DISTANCE;
                    hero.z += aim.z * DASH_DISTANCE;
                    clamp_hero(hero);
                }
            }
            SkillKind::A => {
                self.set_ready(team, skill, now + SKILL_A.cooldown);
                self.launch_projectile(team, hx, hz, owner, aim, &SKILL_A);
            }
        }
        debug!("team {} cast {:?} at t={:.2}", team.number(), skill, now);
    }

    fn set_ready(&mut self, team: Team, skill: SkillKind, at: f32) {
        if let Some(hero) = self.units.hero_mut(team) {
            if let EntityKind::Hero {
                q_ready,
                e_ready,
                a_ready,
            } = &mut hero.kind
            {
                match skill {
                    SkillKind::Q => *q_ready = at,
                    SkillKind::E => *e_ready = at,
                    SkillKind::A => *a_ready = at,
                }
            }
        }
    }

    fn launch_projectile(
        &mut self,
        team: Team,
        x: f32,
        z: f32,
        owner: String,
        aim: Vec2,
        spec: &NukeSpec,
    ) {
        let id = self.units.create(
            EntityKind::Projectile {
                range: spec.range,
                damage: spec.damage,
                owner,
            },
            team,
            x,
            z,
            1.0,
        );
        if let Some(projectile) = self.units.get_mut(&id) {
            projectile.vx = aim.x * spec.speed;
            projectile.vz = aim.z * spec.speed;
        }
    }
}

/// Resolves the direction a cast should fly, identically for local input
/// and for a guest's declared state. Precedence: an explicit drag vector,
/// else lock-on toward the nearest living enemy, else the vector from the
/// hero to the pointer's world position. With no hero to aim from, the
/// +x axis is returned.
pub fn resolve_aim(units: &EntityTable, team: Team, input: &InputFrame) -> Vec2 {
    let Some(hero) = units.hero(team) else {
        return Vec2::new(1.0, 0.0);
    };
    if let Some(drag) = input.drag {
        return Vec2::dir(drag.x, drag.z);
    }
    if input.lock_on {
        if let Some(target) = units.nearest_enemy(team, hero.x, hero.z) {
            return Vec2::dir(target.x - hero.x, target.z - hero.z);
        }
    }
    Vec2::dir(input.pointer.x - hero.x, input.pointer.z - hero.z)
}
