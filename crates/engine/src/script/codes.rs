//! Symbolic arguments that loaders rewrite into numeric codes.

use super::coerce::s2i;

pub trait ScriptCode: Sized + Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn script_name(self) -> &'static str;

    fn from_script_name(text: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.script_name() == text)
    }

    /// Decodes an argument previously written by [`ScriptCode::to_arg`].
    fn from_arg(arg: &str) -> Option<Self> {
        let idx = usize::try_from(s2i(arg)).ok()?;
        Self::ALL.get(idx).copied()
    }

    fn to_arg(self) -> String {
        Self::ALL
            .iter()
            .position(|code| *code == self)
            .unwrap_or_default()
            .to_string()
    }
}

macro_rules! script_code {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl ScriptCode for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn script_name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }
    };
}

script_code!(CalculateOp {
    Sum => "+",
    Subtract => "-",
    Multiply => "*",
    Divide => "/",
    Modulo => "%",
});

script_code!(ComparisonOp {
    Equal => "=",
    NotEqual => "!=",
    Less => "<",
    Greater => ">",
    LessOrEqual => "<=",
    GreaterOrEqual => ">=",
});

script_code!(TargetMob {
    SelfMob => "self",
    Focus => "focus",
    Trigger => "trigger",
    Link => "link",
    Parent => "parent",
});

script_code!(AreaInfo {
    DayMinutes => "day_minutes",
    FieldPikmin => "field_pikmin",
});

script_code!(EventInfo {
    BodyPart => "body_part",
    FrameSignal => "frame_signal",
    Hazard => "hazard",
    InputName => "input_name",
    InputValue => "input_value",
    Message => "message",
    OtherBodyPart => "other_body_part",
});

script_code!(MobInfo {
    Angle => "angle",
    ChompedPikmin => "chomped_pikmin",
    FocusDistance => "focus_distance",
    GroupTaskPower => "group_task_power",
    Health => "health",
    HealthRatio => "health_ratio",
    Id => "id",
    LatchedPikmin => "latched_pikmin",
    LatchedPikminWeight => "latched_pikmin_weight",
    MobCategory => "mob_category",
    MobType => "mob_type",
    State => "state",
    Weight => "weight",
    X => "x",
    Y => "y",
    Z => "z",
});

script_code!(MoveTarget {
    AwayFromFocusedMob => "away_from_focused_mob",
    FocusedMob => "focused_mob",
    FocusedMobPosition => "focused_mob_position",
    Home => "home",
    LinkedMobAverage => "linked_mob_average",
});

script_code!(StabilizeReference {
    Lowest => "lowest",
    Highest => "highest",
});

script_code!(TurnTarget {
    FocusedMob => "focused_mob",
    Home => "home",
});

script_code!(AnimOption {
    Normal => "normal",
    NoRestart => "no_restart",
    RandomTime => "random_time",
    RandomTimeOnSpawn => "random_time_on_spawn",
});

pub const HOLDABLE_BY_PIKMIN: i32 = 1;
pub const HOLDABLE_BY_ENEMIES: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_survive_the_argument_encoding() {
        let arg = ComparisonOp::GreaterOrEqual.to_arg();
        assert_eq!(arg, "5");
        assert_eq!(ComparisonOp::from_arg(&arg), Some(ComparisonOp::GreaterOrEqual));
        assert_eq!(ComparisonOp::from_arg("-1"), None);
        assert_eq!(MobInfo::from_script_name("latched_pikmin_weight"), Some(MobInfo::LatchedPikminWeight));
    }
}
