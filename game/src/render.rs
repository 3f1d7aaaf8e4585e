use engine::{LinkStatus, Session};
use macroquad::prelude::*;
use shared::config::{LANE_Z, MAP_H, MAP_W};
use shared::{Entity, EntityKind, Team, Vec2};

const MINIMAP_W: f32 = 180.0;
const MINIMAP_H: f32 = 108.0;
/// Sight radius friendly heroes, towers and cores grant on the minimap;
/// creeps use their own stealth-reveal radius instead.
const FOG_SIGHT: f32 = 320.0;

const BACKDROP: Color = Color::new(0.059, 0.090, 0.165, 1.0); // #0f172a
const LANE_BAND: Color = Color::new(0.122, 0.161, 0.216, 1.0); // #1f2937

fn fill_color(entity: &Entity) -> Color {
    let team1 = entity.team == Team::One;
    match entity.kind {
        EntityKind::Hero { .. } => {
            if team1 {
                Color::from_rgba(96, 165, 250, 255)
            } else {
                Color::from_rgba(245, 158, 11, 255)
            }
        }
        EntityKind::Creep { .. } => {
            if team1 {
                Color::from_rgba(34, 211, 238, 255)
            } else {
                Color::from_rgba(251, 113, 133, 255)
            }
        }
        EntityKind::Tower => {
            if team1 {
                Color::from_rgba(56, 189, 248, 255)
            } else {
                Color::from_rgba(248, 113, 113, 255)
            }
        }
        EntityKind::Core => {
            if team1 {
                Color::from_rgba(125, 211, 252, 255)
            } else {
                Color::from_rgba(252, 165, 165, 255)
            }
        }
        EntityKind::Projectile { .. } => Color::from_rgba(234, 179, 8, 255),
    }
}

fn hp_bar_color(ratio: f32) -> Color {
    if ratio > 0.5 {
        Color::from_rgba(34, 197, 94, 255)
    } else if ratio > 0.2 {
        Color::from_rgba(245, 158, 11, 255)
    } else {
        Color::from_rgba(239, 68, 68, 255)
    }
}

/// Smooth-follow camera over the world plane. Approaches its target
/// exponentially and never shows past the map edge.
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    fn update(&mut self, dt: f32, target: Option<(f32, f32)>) {
        let Some((tx, tz)) = target else { return };
        let goal_x = tx - screen_width() / 2.0;
        let goal_y = tz - screen_height() / 2.0;
        let k = (dt * 4.0).min(1.0);
        self.x += (goal_x - self.x) * k;
        self.y += (goal_y - self.y) * k;
        self.x = self.x.clamp(0.0, (MAP_W - screen_width()).max(0.0));
        self.y = self.y.clamp(0.0, (MAP_H - screen_height()).max(0.0));
    }

    pub fn to_world(&self, sx: f32, sy: f32) -> Vec2 {
        Vec2::new(sx + self.x, sy + self.y)
    }

    fn to_screen(&self, x: f32, z: f32) -> (f32, f32) {
        (x - self.x, z - self.y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Renderer {
    pub camera: Camera,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(),
        }
    }

    pub fn draw(&mut self, session: &Session, lock_on: bool) {
        let dt = get_frame_time();
        let target = session
            .units()
            .hero(session.my_team())
            .map(|h| (h.x, h.z));
        self.camera.update(dt, target);

        clear_background(BACKDROP);
        self.draw_map();
        self.draw_entities(session);
        self.draw_hp_bars(session);
        self.draw_ui(session, lock_on);
        self.draw_minimap(session);
    }

    fn draw_map(&self) {
        let (x, y) = self.camera.to_screen(0.0, 0.0);
        draw_rectangle(x, y, MAP_W, MAP_H, BACKDROP);
        let (lx, ly) = self.camera.to_screen(0.0, LANE_Z - 40.0);
        draw_rectangle(lx, ly, MAP_W, 80.0, LANE_BAND);
    }

    fn draw_entities(&self, session: &Session) {
        // draw back-to-front: structures, creeps, heroes, projectiles
        self.draw_kind(session, |k| matches!(k, EntityKind::Core));
        self.draw_kind(session, |k| matches!(k, EntityKind::Tower));
        self.draw_kind(session, |k| matches!(k, EntityKind::Creep { .. }));
        self.draw_kind(session, |k| matches!(k, EntityKind::Hero { .. }));
        self.draw_kind(session, |k| matches!(k, EntityKind::Projectile { .. }));
    }

    fn draw_kind(&self, session: &Session, want: fn(&EntityKind) -> bool) {
        for e in session.units().iter().filter(|e| want(&e.kind)) {
            let (x, y) = self.camera.to_screen(e.x, e.z);
            match e.kind {
                EntityKind::Core => {
                    draw_circle(x, y, e.radius(), fill_color(e));
                    draw_circle_lines(x, y, e.radius(), 3.0, WHITE);
                }
                EntityKind::Tower => {
                    draw_circle(x, y, e.radius(), fill_color(e));
                    draw_circle_lines(x, y, e.radius(), 2.0, Color::from_rgba(229, 231, 235, 255));
                }
                EntityKind::Hero { .. } => {
                    draw_circle(x, y, e.radius(), fill_color(e));
                    draw_circle_lines(x, y, e.radius(), 3.0, Color::from_rgba(17, 24, 39, 255));
                }
                EntityKind::Creep { .. } => draw_circle(x, y, e.radius(), fill_color(e)),
                EntityKind::Projectile { .. } => draw_circle(x, y, 6.0, fill_color(e)),
            }
        }
    }

    fn draw_hp_bars(&self, session: &Session) {
        const BAR_W: f32 = 36.0;
        const BAR_H: f32 = 6.0;
        for e in session.units().iter().filter(|e| !e.is_projectile()) {
            let ratio = (e.hp / e.max_hp).clamp(0.0, 1.0);
            if ratio >= 1.0 {
                continue;
            }
            let (x, y) = self.camera.to_screen(e.x - BAR_W / 2.0, e.z - 28.0);
            draw_rectangle(x, y, BAR_W, BAR_H, Color::from_rgba(17, 24, 39, 255));
            draw_rectangle(x, y, BAR_W * ratio, BAR_H, hp_bar_color(ratio));
        }
    }

    fn draw_ui(&self, session: &Session, lock_on: bool) {
        let status = match session.status() {
            LinkStatus::Offline => "local".to_string(),
            LinkStatus::Waiting => "waiting for peer...".to_string(),
            LinkStatus::Connected => "connected".to_string(),
            LinkStatus::Lost => "connection lost".to_string(),
        };
        let line = format!(
            "{:?} | {} | t={:.1}s | team {}",
            session.role(),
            status,
            session.time(),
            session.my_team().number()
        );
        draw_text(&line, 10.0, 20.0, 18.0, WHITE);

        let [a, q, e] = session.cooldowns();
        let fmt = |label: &str, remaining: f32| {
            if remaining > 0.0 {
                format!("{} {:.1}", label, remaining)
            } else {
                format!("{} ready", label)
            }
        };
        let skills = format!(
            "{} | {} | {}{}",
            fmt("A", a),
            fmt("Q", q),
            fmt("E", e),
            if lock_on { " | LOCK" } else { "" }
        );
        draw_text(&skills, 10.0, screen_height() - 14.0, 18.0, WHITE);

        if let Some(winner) = session.winner() {
            let banner = format!("Team {} Wins!", winner.number());
            let size = 48.0;
            let width = measure_text(&banner, None, size as u16, 1.0).width;
            draw_text(
                &banner,
                (screen_width() - width) / 2.0,
                screen_height() / 2.0,
                size,
                GOLD,
            );
            draw_text(
                "press R to reset",
                (screen_width() - 140.0) / 2.0,
                screen_height() / 2.0 + 28.0,
                18.0,
                WHITE,
            );
        }
    }

    /// Scaled-down map with fog-of-war: enemy dots only show near friendly
    /// sight sources, with creeps contributing their stealth-reveal radius.
    fn draw_minimap(&self, session: &Session) {
        let origin_x = screen_width() - MINIMAP_W - 10.0;
        let origin_y = 10.0;
        draw_rectangle(
            origin_x,
            origin_y,
            MINIMAP_W,
            MINIMAP_H,
            Color::new(1.0, 1.0, 1.0, 0.06),
        );
        let lane_y = origin_y + (LANE_Z / MAP_H) * MINIMAP_H;
        draw_rectangle(
            origin_x,
            lane_y - 3.0,
            MINIMAP_W,
            6.0,
            Color::new(1.0, 1.0, 1.0, 0.12),
        );

        let me = session.my_team();
        let sx = MINIMAP_W / MAP_W;
        let sz = MINIMAP_H / MAP_H;
        for e in session.units().iter() {
            if e.team != me && !Self::revealed(session, me, e) {
                continue;
            }
            let r = match e.kind {
                EntityKind::Hero { .. } => 3.5,
                EntityKind::Core => 4.0,
                EntityKind::Tower => 3.0,
                EntityKind::Creep { .. } => 2.5,
                EntityKind::Projectile { .. } => 2.0,
            };
            draw_circle(origin_x + e.x * sx, origin_y + e.z * sz, r, fill_color(e));
        }
    }

    fn revealed(session: &Session, me: Team, enemy: &Entity) -> bool {
        session.units().iter().any(|friend| {
            if friend.team != me || !friend.is_alive() {
                return false;
            }
            let sight = match friend.kind {
                EntityKind::Creep { reveal_radius } => reveal_radius.unwrap_or(0.0),
                EntityKind::Projectile { .. } => 0.0,
                _ => FOG_SIGHT,
            };
            enemy.distance_to_point(friend.x, friend.z) < sight
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
