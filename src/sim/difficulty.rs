//! Difficulty levels and the stalk tuning they select

use serde::{Deserialize, Deserializer, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

/// Unknown keys load as `Normal` instead of failing the enclosing struct
impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Difficulty::from_key(&key))
    }
}

/// Per-stalk values fixed at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StalkTuning {
    /// Fall velocity while unsevered (px/tick)
    pub fall_velocity: f32,
    /// Hits needed to sever
    pub hit_points: u8,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Parse a UI key; anything unrecognised falls back to `Normal`
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "normal" => Difficulty::Normal,
            "hard" => Difficulty::Hard,
            "extreme" => Difficulty::Extreme,
            other => {
                log::debug!("Unknown difficulty {:?}, using normal", other);
                Difficulty::Normal
            }
        }
    }

    pub fn tuning(&self) -> StalkTuning {
        let (fall_velocity, hit_points) = match self {
            Difficulty::Easy => (1.0, 1),
            Difficulty::Normal => (2.0, 2),
            Difficulty::Hard => (3.0, 3),
            Difficulty::Extreme => (4.0, 5),
        };
        StalkTuning {
            fall_velocity,
            hit_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuning_table() {
        let rows: Vec<(f32, u8)> = Difficulty::ALL
            .iter()
            .map(|d| (d.tuning().fall_velocity, d.tuning().hit_points))
            .collect();
        assert_eq!(rows, vec![(1.0, 1), (2.0, 2), (3.0, 3), (4.0, 5)]);
    }

    #[test]
    fn test_from_key_round_trips_names() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_key(d.as_str()), d);
        }
        assert_eq!(Difficulty::from_key(" HARD "), Difficulty::Hard);
    }

    #[test]
    fn test_unknown_key_falls_back_to_normal() {
        assert_eq!(Difficulty::from_key(""), Difficulty::Normal);
        assert_eq!(Difficulty::from_key("nightmare"), Difficulty::Normal);
    }

    #[test]
    fn test_deserialize_uses_key_fallback() {
        let parsed: Vec<Difficulty> =
            serde_json::from_str(r#"["extreme", "Hard", "nightmare"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Difficulty::Extreme, Difficulty::Hard, Difficulty::Normal]
        );
        assert_eq!(
            serde_json::to_string(&Difficulty::Easy).unwrap(),
            r#""easy""#
        );
    }
}
