//! Load-time hooks that validate a parsed call and rewrite names into
//! indexes the runners can use directly.

use crate::mob::Team;

use super::action::ActionLoadContext;
use super::call::{ActionCall, ActionParseError};
use super::codes::{
    AnimOption, AreaInfo, CalculateOp, ComparisonOp, EventInfo, MobInfo, MoveTarget, ScriptCode,
    StabilizeReference, TargetMob, TurnTarget, HOLDABLE_BY_ENEMIES, HOLDABLE_BY_PIKMIN,
};

type LoadResult = Result<(), ActionParseError>;

fn load_code<C: ScriptCode>(call: &mut ActionCall, arg: usize, param: &str) -> LoadResult {
    let Some(value) = call.args.get(arg) else {
        return Ok(());
    };
    let code = C::from_script_name(value).ok_or_else(|| ActionParseError::UnknownEnumValue {
        param: param.to_string(),
        value: value.clone(),
    })?;
    call.args[arg] = code.to_arg();
    Ok(())
}

pub fn calculate(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<CalculateOp>(call, 2, "operation")
}

pub fn focus(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<TargetMob>(call, 0, "target")
}

pub fn get_area_info(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<AreaInfo>(call, 1, "info")
}

pub fn get_event_info(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<EventInfo>(call, 1, "info")
}

pub fn get_mob_info(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<TargetMob>(call, 1, "target")?;
    load_code::<MobInfo>(call, 2, "info")
}

pub fn hold_focused_mob(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    let part = ctx
        .mob_type
        .body_part_index(&call.args[0])
        .ok_or_else(|| ActionParseError::UnknownBodyPart(call.args[0].clone()))?;
    call.args[0] = part.to_string();
    Ok(())
}

pub fn if_function(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<ComparisonOp>(call, 1, "operation")
}

pub fn move_to_target(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<MoveTarget>(call, 0, "target")
}

pub fn receive_status(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    known_status(call, ctx)
}

pub fn remove_status(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    known_status(call, ctx)
}

fn known_status(call: &ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    if ctx.catalog.status_type(&call.args[0]).is_none() {
        return Err(ActionParseError::UnknownStatusEffect(call.args[0].clone()));
    }
    Ok(())
}

pub fn set_animation(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    let anim = ctx
        .mob_type
        .animation_index(&call.args[0])
        .ok_or_else(|| ActionParseError::UnknownAnimation(call.args[0].clone()))?;
    call.args[0] = anim.to_string();
    for arg in call.args.iter_mut().skip(1) {
        let option = AnimOption::from_script_name(arg).unwrap_or(AnimOption::Normal);
        *arg = option.to_arg();
    }
    Ok(())
}

pub fn set_holdable(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    for arg in call.args.iter_mut() {
        let flag = match arg.as_str() {
            "pikmin" => HOLDABLE_BY_PIKMIN,
            "enemies" => HOLDABLE_BY_ENEMIES,
            _ => {
                return Err(ActionParseError::UnknownEnumValue {
                    param: "options".to_string(),
                    value: arg.clone(),
                })
            }
        };
        *arg = flag.to_string();
    }
    Ok(())
}

/// Shared by `set_far_reach` and `set_near_reach`.
pub fn set_reach(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    let reach = ctx
        .mob_type
        .reach_index(&call.args[0])
        .ok_or_else(|| ActionParseError::UnknownReach(call.args[0].clone()))?;
    call.args[0] = reach.to_string();
    Ok(())
}

pub fn set_team(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    let team = Team::from_name(&call.args[0])
        .ok_or_else(|| ActionParseError::UnknownTeam(call.args[0].clone()))?;
    call.args[0] = team.index().to_string();
    Ok(())
}

pub fn spawn(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    let spawn = ctx
        .mob_type
        .spawn_index(&call.args[0])
        .ok_or_else(|| ActionParseError::UnknownSpawnBlock(call.args[0].clone()))?;
    call.args[0] = spawn.to_string();
    Ok(())
}

pub fn stabilize_z(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<StabilizeReference>(call, 0, "reference")
}

pub fn start_chomping(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    for arg in call.args.iter_mut().skip(1) {
        let part = ctx
            .mob_type
            .body_part_index(arg)
            .ok_or_else(|| ActionParseError::UnknownBodyPart(arg.clone()))?;
        *arg = part.to_string();
    }
    Ok(())
}

pub fn start_particles(call: &mut ActionCall, ctx: &ActionLoadContext<'_>) -> LoadResult {
    if !ctx.catalog.particle_generators.contains(&call.args[0]) {
        return Err(ActionParseError::UnknownParticleGenerator(
            call.args[0].clone(),
        ));
    }
    Ok(())
}

pub fn turn_to_target(call: &mut ActionCall, _ctx: &ActionLoadContext<'_>) -> LoadResult {
    load_code::<TurnTarget>(call, 0, "target")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob::{ContentCatalog, HitboxDef, MobCategoryId, MobType, Reach, StatusType};
    use crate::script::ActionRegistry;

    fn fixture() -> (MobType, ContentCatalog) {
        let mut mob_type = MobType::new("Bulborb", MobCategoryId::Enemies)
            .with_animations(&["idling", "chomping"]);
        mob_type.hitboxes = vec![HitboxDef::new("body", 10.0), HitboxDef::new("mouth", 5.0)];
        mob_type.reaches = vec![Reach {
            name: "search".to_string(),
            radius: 100.0,
        }];
        let mut catalog = ContentCatalog::default();
        catalog.add_status_type(StatusType::new("fire"));
        catalog.particle_generators.insert("smoke".to_string());
        (mob_type, catalog)
    }

    fn parse(line: &str) -> Result<ActionCall, ActionParseError> {
        let (mob_type, catalog) = fixture();
        let registry = ActionRegistry::with_builtin_actions();
        let ctx = ActionLoadContext {
            mob_type: &mob_type,
            catalog: &catalog,
        };
        ActionCall::parse(&registry, line, &ctx)
    }

    #[test]
    fn operators_become_codes() {
        let call = parse("calculate total 1 % 2").expect("calculate");
        assert_eq!(call.args[2], CalculateOp::Modulo.to_arg());
        let call = parse("if $a <= 3").expect("if");
        assert_eq!(call.args[1], ComparisonOp::LessOrEqual.to_arg());
    }

    #[test]
    fn unknown_enum_tokens_report_the_parameter() {
        let err = parse("calculate total 1 ^ 2").expect_err("err");
        assert_eq!(
            err.to_string(),
            "The parameter \"operation\" does not know what the value \"^\" means!"
        );
        assert!(parse("focus neighbour").is_err());
    }

    #[test]
    fn named_resources_resolve_to_indexes() {
        let call = parse("start_chomping 3 mouth body").expect("chomp");
        assert_eq!(call.args, vec!["3", "1", "0"]);
        let call = parse("set_near_reach search").expect("reach");
        assert_eq!(call.args[0], "0");
        assert_eq!(
            parse("hold_focused_mob tail").expect_err("err"),
            ActionParseError::UnknownBodyPart("tail".to_string())
        );
        assert_eq!(
            parse("spawn baby").expect_err("err"),
            ActionParseError::UnknownSpawnBlock("baby".to_string())
        );
    }

    #[test]
    fn catalog_entries_are_checked() {
        assert!(parse("receive_status fire").is_ok());
        assert_eq!(
            parse("remove_status ice").expect_err("err"),
            ActionParseError::UnknownStatusEffect("ice".to_string())
        );
        assert_eq!(
            parse("start_particles sparkles").expect_err("err"),
            ActionParseError::UnknownParticleGenerator("sparkles".to_string())
        );
    }

    #[test]
    fn holdable_flags_and_teams() {
        let call = parse("set_holdable pikmin enemies").expect("holdable");
        assert_eq!(call.args, vec!["1", "2"]);
        let call = parse("set_team enemy_2").expect("team");
        assert_eq!(call.args[0], Team::Enemy2.index().to_string());
        assert!(parse("set_team aliens").is_err());
    }
}
