use std::path::{Path, PathBuf};

use roxmltree::Node;

use crate::mob::{
    deg_to_rad, AnimationDef, AttackMethod, DropConsumer, DropEffect, DropTypeInfo,
    GroupTaskPose, GroupTaskTypeInfo, HitboxDef, HitboxKind, LeaderTypeInfo, MobCategoryId,
    MobType, MobTypeInfo, PikminTypeInfo, Reach, ResourceTypeInfo, SpawnInfo, Team,
    ToolTypeInfo, TrackRidingPose, TrackTypeInfo, Vec2, DEFAULT_ANIMATION_DURATION,
};

use super::diagnostics::{ContentLoadError, SourceLocation};
use super::xml::{name_list, parse_document, read_file, XmlFile};

/// One action line of an event node.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub text: String,
    pub location: SourceLocation,
}

/// An `on_*` node, not yet resolved against the event vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDef {
    pub name: String,
    pub lines: Vec<ScriptLine>,
    pub custom_actions_after: bool,
    pub global_actions_after: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateDef {
    pub name: String,
    pub events: Vec<EventDef>,
    pub location: SourceLocation,
}

/// The `<script>` block of a mob type file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptDef {
    pub file_path: PathBuf,
    pub initial_state: Option<String>,
    pub dying_state: Option<String>,
    pub states_ignoring_death: Vec<String>,
    pub states_ignoring_spray: Vec<String>,
    pub states_ignoring_hazard: Vec<String>,
    pub states: Vec<StateDef>,
    pub global: Vec<EventDef>,
}

#[derive(Debug, Clone)]
pub struct MobTypeDocument {
    pub file_path: PathBuf,
    pub mob_type: MobType,
    pub script: Option<ScriptDef>,
}

pub fn load_mob_type_file(path: &Path) -> Result<MobTypeDocument, ContentLoadError> {
    let raw = read_file(path)?;
    parse_mob_type_document(path, &raw)
}

pub fn parse_mob_type_document(path: &Path, raw: &str) -> Result<MobTypeDocument, ContentLoadError> {
    let doc = parse_document(path, raw)?;
    let xml = XmlFile { path, doc: &doc };
    let root = xml.expect_root("MobType")?;

    let name = xml.required_attr(root, "name")?;
    let category_name = xml.required_attr(root, "category")?;
    let category = MobCategoryId::from_internal_name(category_name).ok_or_else(|| {
        ContentLoadError::UnknownCategory {
            path: path.to_path_buf(),
            category: category_name.to_string(),
            location: xml.location(root),
        }
    })?;

    let mut mob_type = MobType::new(name, category);
    mob_type.info = default_type_info(category);
    let mut script = None;

    for field in root.children().filter(|node| node.is_element()) {
        match field.tag_name().name() {
            "maxHealth" => mob_type.max_health = xml.text(field)?,
            "radius" => mob_type.radius = xml.text(field)?,
            "height" => mob_type.height = xml.text(field)?,
            "moveSpeed" => mob_type.move_speed = xml.text(field)?,
            "weight" => mob_type.weight = xml.text(field)?,
            "maxCarriers" => mob_type.max_carriers = xml.text(field)?,
            "walkable" => mob_type.walkable = xml.text(field)?,
            "team" => {
                let raw = field.text().map(str::trim).unwrap_or_default();
                mob_type.default_team =
                    Team::from_name(raw).ok_or_else(|| xml.invalid(field, "team", raw))?;
            }
            "animations" => mob_type.animations = parse_animations(&xml, field)?,
            "bodyParts" => mob_type.hitboxes = parse_body_parts(&xml, field, mob_type.radius)?,
            "reaches" => mob_type.reaches = parse_reaches(&xml, field)?,
            "spawns" => mob_type.spawns = parse_spawns(&xml, field)?,
            "script" => script = Some(parse_script(&xml, field)?),
            block if block == category.internal_name() => {
                mob_type.info = parse_category_block(&xml, category, field)?;
            }
            _ => return Err(xml.unknown_field(field)),
        }
    }

    Ok(MobTypeDocument {
        file_path: path.to_path_buf(),
        mob_type,
        script,
    })
}

/// Category data a type gets when its file has no category block.
pub fn default_type_info(category: MobCategoryId) -> MobTypeInfo {
    match category {
        MobCategoryId::Pikmin => MobTypeInfo::Pikmin(PikminTypeInfo::default()),
        MobCategoryId::Leaders => MobTypeInfo::Leader(LeaderTypeInfo::default()),
        MobCategoryId::Tools => MobTypeInfo::Tool(ToolTypeInfo::default()),
        MobCategoryId::Drops => MobTypeInfo::Drop(DropTypeInfo::default()),
        MobCategoryId::Tracks => MobTypeInfo::Track(TrackTypeInfo::default()),
        MobCategoryId::GroupTasks => MobTypeInfo::GroupTask(GroupTaskTypeInfo::default()),
        MobCategoryId::Resources => MobTypeInfo::Resource(ResourceTypeInfo::default()),
        _ => MobTypeInfo::Generic,
    }
}

fn parse_animations(
    xml: &XmlFile<'_, '_>,
    node: Node<'_, '_>,
) -> Result<Vec<AnimationDef>, ContentLoadError> {
    let listed = node.text().map(name_list).unwrap_or_default();
    let mut animations: Vec<AnimationDef> = listed
        .into_iter()
        .map(|name| AnimationDef {
            name,
            duration: DEFAULT_ANIMATION_DURATION,
        })
        .collect();
    for child in element_children(xml, node, "animation")? {
        animations.push(AnimationDef {
            name: xml.required_attr(child, "name")?.to_string(),
            duration: xml.attr(child, "duration", DEFAULT_ANIMATION_DURATION)?,
        });
    }
    Ok(animations)
}

fn parse_body_parts(
    xml: &XmlFile<'_, '_>,
    node: Node<'_, '_>,
    default_radius: f32,
) -> Result<Vec<HitboxDef>, ContentLoadError> {
    let listed = node.text().map(name_list).unwrap_or_default();
    let mut hitboxes: Vec<HitboxDef> = listed
        .into_iter()
        .map(|name| HitboxDef::new(name, default_radius))
        .collect();
    for child in element_children(xml, node, "part")? {
        let mut hitbox = HitboxDef::new(
            xml.required_attr(child, "name")?,
            xml.attr(child, "radius", default_radius)?,
        );
        hitbox.offset = xml.attr_point(child, "offset")?.unwrap_or(Vec2::ZERO);
        hitbox.z = xml.attr(child, "z", 0.0)?;
        hitbox.height = xml.attr(child, "height", 0.0)?;
        hitbox.value = xml.attr(child, "value", 1.0)?;
        hitbox.can_pikmin_latch = xml.attr(child, "latch", false)?;
        hitbox.hazard = child.attribute("hazard").map(str::to_string);
        hitbox.kind = match child.attribute("kind").unwrap_or("normal") {
            "normal" => HitboxKind::Normal,
            "attack" => HitboxKind::Attack,
            "disabled" => HitboxKind::Disabled,
            other => return Err(xml.invalid(child, "kind", other)),
        };
        hitboxes.push(hitbox);
    }
    Ok(hitboxes)
}

fn parse_reaches(
    xml: &XmlFile<'_, '_>,
    node: Node<'_, '_>,
) -> Result<Vec<Reach>, ContentLoadError> {
    element_children(xml, node, "reach")?
        .into_iter()
        .map(|child| -> Result<Reach, ContentLoadError> {
            Ok(Reach {
                name: xml.required_attr(child, "name")?.to_string(),
                radius: xml.attr(child, "radius", 0.0)?,
            })
        })
        .collect()
}

fn parse_spawns(
    xml: &XmlFile<'_, '_>,
    node: Node<'_, '_>,
) -> Result<Vec<SpawnInfo>, ContentLoadError> {
    element_children(xml, node, "spawn")?
        .into_iter()
        .map(|child| -> Result<SpawnInfo, ContentLoadError> {
            let vars = child
                .attribute("vars")
                .unwrap_or_default()
                .split(';')
                .filter_map(|pair| pair.split_once('='))
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                .collect();
            Ok(SpawnInfo {
                name: xml.required_attr(child, "name")?.to_string(),
                mob_type_name: xml.required_attr(child, "type")?.to_string(),
                relative: xml.attr(child, "relative", true)?,
                offset: xml.attr_point(child, "offset")?.unwrap_or(Vec2::ZERO),
                z: xml.attr(child, "z", 0.0)?,
                angle: deg_to_rad(xml.attr(child, "angle", 0.0)?),
                vars,
                link_object_to_spawn: xml.attr(child, "linkObjectToSpawn", false)?,
                link_spawn_to_object: xml.attr(child, "linkSpawnToObject", false)?,
                momentum: xml.attr(child, "momentum", 0.0)?,
            })
        })
        .collect()
}

fn element_children<'a, 'input>(
    xml: &XmlFile<'_, '_>,
    node: Node<'a, 'input>,
    expected: &str,
) -> Result<Vec<Node<'a, 'input>>, ContentLoadError> {
    let mut children = Vec::new();
    for child in node.children().filter(|child| child.is_element()) {
        if child.tag_name().name() != expected {
            return Err(xml.unknown_field(child));
        }
        children.push(child);
    }
    Ok(children)
}

fn parse_category_block(
    xml: &XmlFile<'_, '_>,
    category: MobCategoryId,
    node: Node<'_, '_>,
) -> Result<MobTypeInfo, ContentLoadError> {
    let info = match category {
        MobCategoryId::Pikmin => {
            let defaults = PikminTypeInfo::default();
            let attack_method = match node.attribute("attackMethod").unwrap_or("latch") {
                "latch" => AttackMethod::Latch,
                "impact" => AttackMethod::Impact,
                other => return Err(xml.invalid(node, "attackMethod", other)),
            };
            let sprout_evolution_time = match node.attribute("sproutEvolutionTime") {
                Some(raw) => {
                    let times = raw
                        .split_whitespace()
                        .map(str::parse::<f32>)
                        .collect::<Result<Vec<_>, _>>()
                        .ok()
                        .and_then(|times| <[f32; 3]>::try_from(times).ok());
                    times.ok_or_else(|| xml.invalid(node, "sproutEvolutionTime", raw))?
                }
                None => defaults.sprout_evolution_time,
            };
            MobTypeInfo::Pikmin(PikminTypeInfo {
                attack_method,
                attack_power: xml.attr(node, "attackPower", defaults.attack_power)?,
                carry_strength: xml.attr(node, "carryStrength", defaults.carry_strength)?,
                can_fly: xml.attr(node, "canFly", defaults.can_fly)?,
                can_carry_tools: xml.attr(node, "canCarryTools", defaults.can_carry_tools)?,
                knocked_down_duration: xml.attr(
                    node,
                    "knockedDownDuration",
                    defaults.knocked_down_duration,
                )?,
                knocked_down_whistle_bonus: xml.attr(
                    node,
                    "knockedDownWhistleBonus",
                    defaults.knocked_down_whistle_bonus,
                )?,
                sprout_evolution_time,
                idle_bump_delay: xml.attr(node, "idleBumpDelay", defaults.idle_bump_delay)?,
                hazard_immunities: node
                    .attribute("hazardImmunities")
                    .map(name_list)
                    .unwrap_or_default(),
            })
        }
        MobCategoryId::Leaders => {
            let defaults = LeaderTypeInfo::default();
            MobTypeInfo::Leader(LeaderTypeInfo {
                whistle_range: xml.attr(node, "whistleRange", defaults.whistle_range)?,
                whistle_duration: xml.attr(node, "whistleDuration", defaults.whistle_duration)?,
                max_throw_height: xml.attr(node, "maxThrowHeight", defaults.max_throw_height)?,
            })
        }
        MobCategoryId::Tools => MobTypeInfo::Tool(ToolTypeInfo {
            can_be_hotswapped: xml.attr(node, "canBeHotswapped", false)?,
            dropped_when_pikmin_lands: xml.attr(node, "droppedWhenPikminLands", false)?,
            dropped_when_pikmin_lands_on_opponent: xml.attr(
                node,
                "droppedWhenPikminLandsOnOpponent",
                false,
            )?,
            dropped_when_pikmin_is_whistled: xml.attr(node, "droppedWhenPikminIsWhistled", false)?,
            stuck_when_pikmin_lands_on_opponent: xml.attr(
                node,
                "stuckWhenPikminLandsOnOpponent",
                false,
            )?,
            pikmin_returns_after_using: xml.attr(node, "pikminReturnsAfterUsing", false)?,
        }),
        MobCategoryId::Drops => {
            let defaults = DropTypeInfo::default();
            let consumer = match node.attribute("consumer").unwrap_or("pikmin") {
                "pikmin" => DropConsumer::Pikmin,
                "leaders" => DropConsumer::Leaders,
                other => return Err(xml.invalid(node, "consumer", other)),
            };
            let effect = match node.attribute("effect").unwrap_or("increase_maturity") {
                "increase_maturity" => DropEffect::IncreaseMaturity,
                "give_status" => DropEffect::GiveStatus,
                other => return Err(xml.invalid(node, "effect", other)),
            };
            MobTypeInfo::Drop(DropTypeInfo {
                consumer,
                effect,
                increase_amount: xml.attr(node, "increaseAmount", defaults.increase_amount)?,
                status_to_give: node.attribute("statusToGive").map(str::to_string),
                total_doses: xml.attr(node, "totalDoses", defaults.total_doses)?,
            })
        }
        MobCategoryId::Tracks => {
            let defaults = TrackTypeInfo::default();
            let riding_pose = match node.attribute("ridingPose").unwrap_or("stopped") {
                "stopped" => TrackRidingPose::Stopped,
                "climbing" => TrackRidingPose::Climbing,
                "sliding" => TrackRidingPose::Sliding,
                other => return Err(xml.invalid(node, "ridingPose", other)),
            };
            let checkpoints = xml
                .attr_points(node, "checkpoints")?
                .unwrap_or(defaults.checkpoints);
            if checkpoints.len() < 2 {
                return Err(xml.invalid(
                    node,
                    "checkpoints",
                    node.attribute("checkpoints").unwrap_or_default(),
                ));
            }
            MobTypeInfo::Track(TrackTypeInfo {
                checkpoints,
                ride_speed: xml.attr(node, "rideSpeed", defaults.ride_speed)?,
                riding_pose,
                cancellable_with_whistle: xml.attr(
                    node,
                    "cancellableWithWhistle",
                    defaults.cancellable_with_whistle,
                )?,
                ridable_by_pikmin: xml.attr(node, "ridableByPikmin", defaults.ridable_by_pikmin)?,
                ridable_by_leaders: xml.attr(
                    node,
                    "ridableByLeaders",
                    defaults.ridable_by_leaders,
                )?,
            })
        }
        MobCategoryId::GroupTasks => {
            let defaults = GroupTaskTypeInfo::default();
            let worker_pikmin_pose = match node.attribute("workerPikminPose").unwrap_or("standing")
            {
                "standing" => GroupTaskPose::Standing,
                "arms_stretched" => GroupTaskPose::ArmsStretched,
                "pushing" => GroupTaskPose::Pushing,
                other => return Err(xml.invalid(node, "workerPikminPose", other)),
            };
            MobTypeInfo::GroupTask(GroupTaskTypeInfo {
                power_goal: xml.attr(node, "powerGoal", defaults.power_goal)?,
                spots: xml.attr_points(node, "spots")?.unwrap_or(defaults.spots),
                worker_pikmin_pose,
                flying_pikmin_only: xml.attr(
                    node,
                    "flyingPikminOnly",
                    defaults.flying_pikmin_only,
                )?,
            })
        }
        MobCategoryId::Resources => {
            let defaults = ResourceTypeInfo::default();
            MobTypeInfo::Resource(ResourceTypeInfo {
                vanish_delay: xml.attr(node, "vanishDelay", defaults.vanish_delay)?,
                delivery_duration: xml.attr(node, "deliveryDuration", defaults.delivery_duration)?,
                return_point: xml.attr_point(node, "returnPoint")?,
            })
        }
        _ => return Err(xml.unknown_field(node)),
    };
    Ok(info)
}

fn parse_script(xml: &XmlFile<'_, '_>, node: Node<'_, '_>) -> Result<ScriptDef, ContentLoadError> {
    let mut script = ScriptDef {
        file_path: xml.path.to_path_buf(),
        initial_state: node.attribute("initialState").map(str::to_string),
        dying_state: node.attribute("dyingState").map(str::to_string),
        states_ignoring_death: node
            .attribute("statesIgnoringDeath")
            .map(name_list)
            .unwrap_or_default(),
        states_ignoring_spray: node
            .attribute("statesIgnoringSpray")
            .map(name_list)
            .unwrap_or_default(),
        states_ignoring_hazard: node
            .attribute("statesIgnoringHazard")
            .map(name_list)
            .unwrap_or_default(),
        ..ScriptDef::default()
    };

    for child in node.children().filter(|child| child.is_element()) {
        match child.tag_name().name() {
            "state" => {
                let events = child
                    .children()
                    .filter(|event| event.is_element())
                    .map(|event| parse_event(xml, event))
                    .collect();
                script.states.push(StateDef {
                    name: xml.required_attr(child, "name")?.to_string(),
                    events,
                    location: xml.location(child),
                });
            }
            "global" => {
                script.global.extend(
                    child
                        .children()
                        .filter(|event| event.is_element())
                        .map(|event| parse_event(xml, event)),
                );
            }
            _ => return Err(xml.unknown_field(child)),
        }
    }
    Ok(script)
}

fn parse_event(xml: &XmlFile<'_, '_>, node: Node<'_, '_>) -> EventDef {
    let mut lines = Vec::new();
    for text_node in node.children().filter(|child| child.is_text()) {
        let Some(text) = text_node.text() else {
            continue;
        };
        let mut offset = text_node.range().start;
        for raw_line in text.split('\n') {
            let trimmed = raw_line.trim_start();
            let lead = raw_line.len() - trimmed.len();
            let trimmed = trimmed.trim_end();
            if !trimmed.is_empty() {
                lines.push(ScriptLine {
                    text: trimmed.to_string(),
                    location: xml.location_at(offset + lead),
                });
            }
            offset += raw_line.len() + 1;
        }
    }
    EventDef {
        name: node.tag_name().name().to_string(),
        lines,
        custom_actions_after: flag(node, "custom_actions_after"),
        global_actions_after: flag(node, "global_actions_after"),
        location: xml.location(node),
    }
}

fn flag(node: Node<'_, '_>, name: &str) -> bool {
    node.attribute(name)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BULBORB: &str = r#"<MobType category="enemy" name="Bulborb">
  <maxHealth>750</maxHealth>
  <radius>40</radius>
  <animations>idling walking</animations>
  <bodyParts><part name="mouth" radius="20" kind="attack" value="50"/></bodyParts>
  <reaches><reach name="search" radius="300"/></reaches>
  <script initialState="sleeping" dyingState="dying" statesIgnoringDeath="dying">
    <state name="sleeping">
      <on_enter>
        set_animation idling
        set_timer 5
      </on_enter>
      <on_timer custom_actions_after="true">set_state walking</on_timer>
    </state>
    <global><on_damage global_actions_after="true">print ouch</on_damage></global>
  </script>
</MobType>"#;

    #[test]
    fn mob_type_fields_and_script_are_read() {
        let doc = parse_mob_type_document(Path::new("bulborb.xml"), BULBORB).expect("parse");
        let mob_type = &doc.mob_type;
        assert_eq!(mob_type.category, MobCategoryId::Enemies);
        assert_eq!(mob_type.max_health, 750.0);
        assert_eq!(mob_type.animation_index("walking"), Some(1));
        assert_eq!(mob_type.hitboxes[0].kind, HitboxKind::Attack);
        assert_eq!(mob_type.reach_index("search"), Some(0));

        let script = doc.script.expect("script");
        assert_eq!(script.initial_state.as_deref(), Some("sleeping"));
        assert_eq!(script.states_ignoring_death, vec!["dying"]);
        let on_enter = &script.states[0].events[0];
        assert_eq!(on_enter.name, "on_enter");
        assert_eq!(
            on_enter.lines.iter().map(|line| line.text.as_str()).collect::<Vec<_>>(),
            vec!["set_animation idling", "set_timer 5"]
        );
        assert_eq!(on_enter.lines[1].location.line, 11);
        assert!(script.states[0].events[1].custom_actions_after);
        assert!(script.global[0].global_actions_after);
    }

    #[test]
    fn category_block_overrides_defaults() {
        let raw = r#"<MobType category="pikmin" name="Yellow Pikmin">
            <pikmin attackMethod="impact" carryStrength="1.5" sproutEvolutionTime="10 20 30"/>
        </MobType>"#;
        let doc = parse_mob_type_document(Path::new("yellow.xml"), raw).expect("parse");
        let info = doc.mob_type.pikmin_info().expect("pikmin info");
        assert_eq!(info.attack_method, AttackMethod::Impact);
        assert_eq!(info.carry_strength, 1.5);
        assert_eq!(info.sprout_evolution_time, [10.0, 20.0, 30.0]);
        assert_eq!(info.attack_power, 1.0);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let raw = r#"<MobType category="spaceship" name="Hocotate"/>"#;
        let err = parse_mob_type_document(Path::new("ship.xml"), raw).expect_err("category");
        assert!(matches!(err, ContentLoadError::UnknownCategory { ref category, .. } if category == "spaceship"));
    }

    #[test]
    fn wrong_root_and_stray_fields_are_rejected() {
        let err = parse_mob_type_document(Path::new("x.xml"), "<Defs/>").expect_err("root");
        assert!(matches!(err, ContentLoadError::InvalidRoot { expected: "MobType", .. }));

        let raw = r#"<MobType category="enemy" name="X"><wings>2</wings></MobType>"#;
        let err = parse_mob_type_document(Path::new("x.xml"), raw).expect_err("field");
        assert!(matches!(err, ContentLoadError::UnknownField { ref field, .. } if field == "wings"));
    }
}
