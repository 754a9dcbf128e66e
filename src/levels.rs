//! Built-in level catalog
//!
//! Levels are plain data; hosts may also load their own from JSON.

use std::collections::HashSet;

use crate::sim::{Level, LevelError, Obstacle};
use crate::tuning::Tuning;

fn spike(x: f32) -> Obstacle {
    Obstacle::Spike {
        x,
        width: 46.0,
        height: 56.0,
    }
}

fn block(x: f32, width: f32, height: f32) -> Obstacle {
    Obstacle::Block { x, width, height }
}

fn pad(x: f32) -> Obstacle {
    Obstacle::Pad {
        x,
        width: 70.0,
        height: 16.0,
    }
}

fn orb(x: f32, y_from_top: f32) -> Obstacle {
    Obstacle::Orb {
        x,
        y_from_top,
        radius: 16.0,
    }
}

fn portal(x: f32) -> Obstacle {
    Obstacle::GravityPortal {
        x,
        y_from_top: 0.0,
        width: 60.0,
        height: 480.0,
    }
}

/// All built-in levels, in menu order
pub fn catalog() -> Vec<Level> {
    vec![
        Level::new(
            "l1",
            620.0,
            6200.0,
            vec![
                spike(1700.0),
                block(2100.0, 90.0, 110.0),
                spike(2500.0),
                pad(2700.0),
                block(2860.0, 110.0, 170.0),
                spike(3320.0),
                block(3650.0, 100.0, 140.0),
                spike(4200.0),
                spike(4380.0),
                block(4900.0, 150.0, 130.0),
                spike(5480.0),
            ],
        )
        .with_name("Neon Steps", "Easy"),
        Level::new(
            "l2",
            690.0,
            7000.0,
            vec![
                spike(1700.0),
                spike(1880.0),
                block(2300.0, 120.0, 170.0),
                spike(2750.0),
                pad(2960.0),
                block(3120.0, 160.0, 150.0),
                spike(3650.0),
                block(4020.0, 120.0, 230.0),
                spike(4660.0),
                block(5050.0, 180.0, 160.0),
                spike(5750.0),
                spike(5930.0),
            ],
        )
        .with_name("Pulse Lane", "Medium"),
        Level::new(
            "l3",
            740.0,
            7600.0,
            vec![
                spike(1800.0),
                block(2200.0, 140.0, 230.0),
                spike(2700.0),
                pad(2920.0),
                block(3080.0, 200.0, 160.0),
                spike(3600.0),
                block(3950.0, 140.0, 280.0),
                spike(4620.0),
                block(4980.0, 240.0, 170.0),
                spike(5650.0),
                block(6000.0, 160.0, 320.0),
                spike(6750.0),
            ],
        )
        .with_name("Ion Rush", "Hard"),
        Level::new(
            "l4",
            650.0,
            7200.0,
            vec![
                spike(1600.0),
                orb(2300.0, 300.0),
                block(2400.0, 120.0, 150.0),
                portal(3200.0),
                spike(3800.0),
                block(4300.0, 100.0, 120.0),
                portal(5000.0),
                pad(5400.0),
                block(5560.0, 110.0, 170.0),
                spike(6200.0),
            ],
        )
        .with_name("Flip Side", "Medium")
        .with_tuning(Tuning {
            gravity: 3000.0,
            jump_velocity: 860.0,
            ..Default::default()
        }),
    ]
}

/// Look up a built-in level by id
pub fn find(id: &str) -> Option<Level> {
    catalog().into_iter().find(|level| level.id == id)
}

/// Parse a JSON array of levels, validating each and rejecting duplicate ids
pub fn load_catalog_json(json: &str) -> Result<Vec<Level>, LevelError> {
    let levels: Vec<Level> =
        serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
    let mut seen = HashSet::new();
    for level in &levels {
        level.validate()?;
        if !seen.insert(level.id.as_str()) {
            return Err(LevelError::DuplicateId(level.id.clone()));
        }
    }
    log::info!("Loaded {} levels", levels.len());
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        let levels = catalog();
        assert_eq!(levels.len(), 4);
        for level in &levels {
            assert!(level.validate().is_ok(), "{} invalid", level.id);
        }
        let ids: HashSet<_> = levels.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids.len(), levels.len());
    }

    #[test]
    fn test_find() {
        let level = find("l2").unwrap();
        assert_eq!(level.name, "Pulse Lane");
        assert_eq!(level.horizontal_speed, 690.0);
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_flip_side_has_own_tuning() {
        let level = find("l4").unwrap();
        assert_eq!(level.tuning().jump_velocity, 860.0);
        assert_eq!(find("l1").unwrap().tuning(), Tuning::default());
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let json = serde_json::to_string(&catalog()).unwrap();
        let levels = load_catalog_json(&json).unwrap();
        assert_eq!(levels, catalog());
    }

    #[test]
    fn test_catalog_json_rejects_duplicates() {
        let json = r#"[
            { "id": "a", "speed": 600.0, "length": 1000.0 },
            { "id": "a", "speed": 700.0, "length": 2000.0 }
        ]"#;
        assert_eq!(
            load_catalog_json(json),
            Err(LevelError::DuplicateId("a".to_string()))
        );
    }
}
