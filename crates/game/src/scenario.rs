//! Demo scenarios: what to spawn and which leader orders to give on which
//! frame. Stored as JSON next to the base content.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use engine::Vec2;
use serde::{Deserialize, Serialize};

pub type ScenarioResult<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub spawns: Vec<ScenarioSpawn>,
    #[serde(default)]
    pub orders: Vec<ScheduledOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioSpawn {
    pub mob_type: String,
    pub position: Vec2,
    #[serde(default)]
    pub angle_deg: f32,
}

/// An order for the leader spawned at index `leader`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduledOrder {
    pub frame: u32,
    pub leader: usize,
    pub order: LeaderOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderOrder {
    Activate,
    Deactivate,
    MoveTo { to: Vec2 },
    Stop,
    StartWhistle,
    StopWhistle,
    Grab { target: usize },
    Throw { to: Vec2 },
    Release,
    Dismiss,
}

pub fn load_scenario(path: &Path) -> ScenarioResult<Scenario> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read scenario '{}': {error}", path.display()))?;
    let scenario = parse_scenario_json(&raw)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn parse_scenario_json(raw: &str) -> ScenarioResult<Scenario> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, Scenario>(&mut deserializer) {
        Ok(scenario) => Ok(scenario),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse scenario json: {source}"))
            } else {
                Err(format!("parse scenario json at {path}: {source}"))
            }
        }
    }
}

fn validation_err(path: &str, message: impl Into<String>) -> String {
    format!("validation failed at {path}: {}", message.into())
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> String {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

fn check_finite(path: &str, value: f32) -> ScenarioResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(expected_actual(path, "finite number", value))
    }
}

fn check_finite_point(path: &str, point: Vec2) -> ScenarioResult<()> {
    check_finite(&format!("{path}.x"), point.x)?;
    check_finite(&format!("{path}.y"), point.y)
}

fn check_spawn_index(path: &str, index: usize, spawn_count: usize) -> ScenarioResult<()> {
    if index < spawn_count {
        Ok(())
    } else {
        Err(expected_actual(
            path,
            format!("spawn index below {spawn_count}"),
            index,
        ))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> ScenarioResult<()> {
    for (index, spawn) in scenario.spawns.iter().enumerate() {
        if spawn.mob_type.trim().is_empty() {
            return Err(validation_err(
                &format!("spawns[{index}].mob_type"),
                "mob type name is empty",
            ));
        }
        check_finite_point(&format!("spawns[{index}].position"), spawn.position)?;
        check_finite(&format!("spawns[{index}].angle_deg"), spawn.angle_deg)?;
    }

    let spawn_count = scenario.spawns.len();
    for (index, scheduled) in scenario.orders.iter().enumerate() {
        check_spawn_index(&format!("orders[{index}].leader"), scheduled.leader, spawn_count)?;
        let order_path = format!("orders[{index}].order");
        match scheduled.order {
            LeaderOrder::MoveTo { to } | LeaderOrder::Throw { to } => {
                check_finite_point(&format!("{order_path}.to"), to)?;
            }
            LeaderOrder::Grab { target } => {
                check_spawn_index(&format!("{order_path}.target"), target, spawn_count)?;
                if target == scheduled.leader {
                    return Err(validation_err(
                        &format!("{order_path}.target"),
                        "a leader cannot grab itself",
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Scenario {
        Scenario {
            spawns: vec![
                ScenarioSpawn {
                    mob_type: "Olimar".to_string(),
                    position: Vec2::ZERO,
                    angle_deg: 0.0,
                },
                ScenarioSpawn {
                    mob_type: "Red Pikmin".to_string(),
                    position: Vec2::new(30.0, 0.0),
                    angle_deg: 90.0,
                },
            ],
            orders: vec![
                ScheduledOrder {
                    frame: 0,
                    leader: 0,
                    order: LeaderOrder::Activate,
                },
                ScheduledOrder {
                    frame: 40,
                    leader: 0,
                    order: LeaderOrder::Grab { target: 1 },
                },
            ],
        }
    }

    #[test]
    fn orders_use_snake_case_tags() {
        let raw = r#"{
            "spawns": [{ "mob_type": "Olimar", "position": { "x": 0, "y": 0 } }],
            "orders": [
                { "frame": 2, "leader": 0, "order": "start_whistle" },
                { "frame": 9, "leader": 0, "order": { "throw": { "to": { "x": 40, "y": -5 } } } }
            ]
        }"#;
        let scenario = parse_scenario_json(raw).expect("scenario");
        assert_eq!(scenario.orders[0].order, LeaderOrder::StartWhistle);
        assert_eq!(
            scenario.orders[1].order,
            LeaderOrder::Throw {
                to: Vec2::new(40.0, -5.0)
            }
        );
        assert_eq!(scenario.spawns[0].angle_deg, 0.0);
    }

    #[test]
    fn parse_reports_missing_field_path() {
        let mut value = serde_json::to_value(sample()).expect("to_value");
        value["spawns"][1]
            .as_object_mut()
            .expect("spawn object")
            .remove("mob_type");
        let raw = serde_json::to_string(&value).expect("json");

        let error = parse_scenario_json(&raw).expect_err("missing field should fail");
        assert!(error.contains("parse scenario json at spawns[1]"));
        assert!(error.contains("mob_type"));
    }

    #[test]
    fn parse_reports_unknown_order_path() {
        let mut value = serde_json::to_value(sample()).expect("to_value");
        value["orders"][0]["order"] = json!("dance");
        let raw = serde_json::to_string(&value).expect("json");

        let error = parse_scenario_json(&raw).expect_err("unknown order should fail");
        assert!(error.contains("orders[0].order"));
        assert!(error.contains("unknown variant"));
    }

    #[test]
    fn validate_rejects_orders_for_missing_spawns() {
        let mut scenario = sample();
        scenario.orders[0].leader = 7;
        let error = validate_scenario(&scenario).expect_err("out of range");
        assert_eq!(
            error,
            "validation failed at orders[0].leader: expected spawn index below 2, got 7"
        );
    }

    #[test]
    fn validate_rejects_non_finite_positions() {
        let mut scenario = sample();
        scenario.spawns[1].position.y = f32::NAN;
        let error = validate_scenario(&scenario).expect_err("nan");
        assert!(error.contains("spawns[1].position.y"));
        assert!(error.contains("finite number"));
    }

    #[test]
    fn validate_rejects_self_grabs() {
        let mut scenario = sample();
        scenario.orders[1].order = LeaderOrder::Grab { target: 0 };
        let error = validate_scenario(&scenario).expect_err("self grab");
        assert!(error.contains("orders[1].order.target"));
    }

    #[test]
    fn shipped_demo_scenario_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/base/scenarios/demo.json");
        let scenario = load_scenario(&path).expect("demo scenario");
        assert_eq!(scenario.spawns[0].mob_type, "Olimar");
        assert!(!scenario.orders.is_empty());
    }

    #[test]
    fn sample_scenario_is_valid() {
        assert_eq!(validate_scenario(&sample()), Ok(()));
    }
}
