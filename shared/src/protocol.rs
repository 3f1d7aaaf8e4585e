use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::input::SkillKind;

/// The two message shapes that cross the peer channel, as self-describing
/// JSON objects discriminated by a `type` field. Both are complete: an
/// input message carries everything the host needs to act for the guest's
/// hero, and a state message is a full replacement snapshot, so losing or
/// duplicating either is harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Guest -> host, once per rendered frame: normalized movement intent,
    /// optional one-shot cast, and the aim vector the guest resolved.
    Input {
        mx: f32,
        mz: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cast: Option<SkillKind>,
        ax: f32,
        az: f32,
        #[serde(default)]
        lock: bool,
    },
    /// Host -> guest, on the snapshot cadence: the whole entity table plus
    /// the simulation's running time.
    State { t: f32, units: Vec<Entity> },
}

impl Message {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> Result<Message, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Discriminant name for log lines; avoids dumping a whole snapshot
    /// into the log.
    pub fn label(&self) -> &'static str {
        match self {
            Message::Input { .. } => "input",
            Message::State { .. } => "state",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, Team};

    #[test]
    fn input_roundtrip_with_cast() {
        let msg = Message::Input {
            mx: 0.6,
            mz: -0.8,
            cast: Some(SkillKind::Q),
            ax: 1.0,
            az: 0.0,
            lock: true,
        };
        let text = msg.encode().unwrap();
        assert!(text.contains("\"type\":\"input\""));
        assert_eq!(Message::decode(&text).unwrap(), msg);
    }

    #[test]
    fn input_without_cast_omits_field() {
        let msg = Message::Input {
            mx: 0.0,
            mz: 0.0,
            cast: None,
            ax: 1.0,
            az: 0.0,
            lock: false,
        };
        let text = msg.encode().unwrap();
        assert!(!text.contains("cast"));
        assert_eq!(Message::decode(&text).unwrap(), msg);
    }

    #[test]
    fn state_roundtrip_preserves_units() {
        let units = vec![
            Entity::new("core-1".into(), EntityKind::Core, Team::One, 220.0, 600.0, 1500.0),
            Entity::new(
                "hero-1".into(),
                EntityKind::Hero {
                    q_ready: 1.5,
                    e_ready: 0.0,
                    a_ready: 0.25,
                },
                Team::Two,
                1700.0,
                600.0,
                700.0,
            ),
        ];
        let msg = Message::State { t: 12.5, units };
        let decoded = Message::decode(&msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(Message::decode("").is_err());
        assert!(Message::decode("not json").is_err());
        assert!(Message::decode("{\"type\":\"warp\",\"x\":1}").is_err());
        // wrong team number inside a snapshot
        assert!(Message::decode(
            "{\"type\":\"state\",\"t\":0.0,\"units\":[{\"id\":\"core-1\",\"team\":9,\
             \"x\":0,\"z\":0,\"vx\":0,\"vz\":0,\"hp\":1,\"max_hp\":1,\"type\":\"core\"}]}"
        )
        .is_err());
    }
}
