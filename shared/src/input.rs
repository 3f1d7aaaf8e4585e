use serde::{Deserialize, Serialize};

use crate::vec::Vec2;

/// The three hero actions: ranged nuke, dash, basic attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    Q,
    E,
    A,
}

/// One rendered frame's worth of operator input, already debounced by the
/// capture layer: `cast` is one-shot per press, the movement vector is
/// normalized, and `pointer` has been pushed through the camera into world
/// coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    pub mx: f32,
    pub mz: f32,
    pub cast: Option<SkillKind>,
    /// Explicit aim vector from a drag gesture, if one is in progress.
    /// Takes precedence over lock-on and pointer aim.
    pub drag: Option<Vec2>,
    pub lock_on: bool,
    pub pointer: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_kind_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&SkillKind::Q).unwrap(), "\"Q\"");
        assert_eq!(
            serde_json::from_str::<SkillKind>("\"A\"").unwrap(),
            SkillKind::A
        );
    }

    #[test]
    fn default_frame_is_idle() {
        let f = InputFrame::default();
        assert_eq!(f.mx, 0.0);
        assert!(f.cast.is_none());
        assert!(f.drag.is_none());
        assert!(!f.lock_on);
    }
}
