use thiserror::Error;

use crate::mob::{MobId, MobWorld};

use super::action::{
    ActionKind, ActionLoadContext, ActionRegistry, ActionRunData, ActionRunner, NativeAction,
};
use super::event::{EventPayload, MobEvent};
use super::runners;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("Unknown script action name \"{name}\"!")]
    UnknownAction { name: String },
    #[error(
        "The \"{action}\" action needs {needed} arguments, but this call only has {given}! \
You're missing the \"{missing}\" parameter."
    )]
    TooFewArguments {
        action: String,
        needed: usize,
        given: usize,
        missing: String,
    },
    #[error("The \"{action}\" action only needs {needed} arguments, but this call has {given}!")]
    TooManyArguments {
        action: String,
        needed: usize,
        given: usize,
    },
    #[error(
        "Argument #{position} (\"{arg}\") is a variable, but the parameter \"{param}\" can only be constant!"
    )]
    VariableNotAllowed {
        position: usize,
        arg: String,
        param: String,
    },
    #[error("Argument #{position} refers to a variable but has no variable name!")]
    EmptyVariableName { position: usize },
    #[error("The parameter \"{param}\" does not know what the value \"{value}\" means!")]
    UnknownEnumValue { param: String, value: String },
    #[error("Unknown animation \"{0}\"!")]
    UnknownAnimation(String),
    #[error("Unknown body part \"{0}\"!")]
    UnknownBodyPart(String),
    #[error("Unknown reach \"{0}\"!")]
    UnknownReach(String),
    #[error("Unknown spawn info block \"{0}\"!")]
    UnknownSpawnBlock(String),
    #[error("Unknown status effect \"{0}\"!")]
    UnknownStatusEffect(String),
    #[error("Unknown particle generator \"{0}\"!")]
    UnknownParticleGenerator(String),
    #[error("Unknown team name \"{0}\"!")]
    UnknownTeam(String),
}

/// One resolved invocation of an action, owned by the state it was loaded into.
#[derive(Debug, Clone)]
pub struct ActionCall {
    pub kind: ActionKind,
    pub name: &'static str,
    pub args: Vec<String>,
    pub arg_is_var: Vec<bool>,
    pub parent_event: Option<MobEvent>,
    runner: Option<ActionRunner>,
    code: Option<NativeAction>,
}

impl ActionCall {
    pub fn native(code: NativeAction) -> Self {
        Self {
            kind: ActionKind::Native,
            name: "native",
            args: Vec::new(),
            arg_is_var: Vec::new(),
            parent_event: None,
            runner: None,
            code: Some(code),
        }
    }

    /// `set_state` call whose target still has to be resolved by name.
    pub fn set_state(target: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::SetState,
            name: "set_state",
            args: vec![target.into()],
            arg_is_var: vec![false],
            parent_event: None,
            runner: Some(runners::set_state),
            code: None,
        }
    }

    /// Parses a `verb arg1 arg2 ...` script line.
    pub fn parse(
        registry: &ActionRegistry,
        line: &str,
        ctx: &ActionLoadContext<'_>,
    ) -> Result<Self, ActionParseError> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let action = registry
            .get(verb)
            .ok_or_else(|| ActionParseError::UnknownAction {
                name: verb.to_string(),
            })?;
        let words = words.collect::<Vec<_>>();

        let mandatory = action.mandatory_params();
        if words.len() < mandatory {
            return Err(ActionParseError::TooFewArguments {
                action: action.name.to_string(),
                needed: mandatory,
                given: words.len(),
                missing: action.params[words.len()].name.to_string(),
            });
        }
        if !action.has_extras() && words.len() > action.params.len() {
            return Err(ActionParseError::TooManyArguments {
                action: action.name.to_string(),
                needed: action.params.len(),
                given: words.len(),
            });
        }

        let mut args = Vec::with_capacity(words.len());
        let mut arg_is_var = Vec::with_capacity(words.len());
        for (w, word) in words.iter().enumerate() {
            let param = &action.params[w.min(action.params.len() - 1)];
            let (arg, is_var) = if let Some(escaped) = word.strip_prefix("$$") {
                (format!("${escaped}"), false)
            } else if let Some(var_name) = word.strip_prefix('$') {
                if var_name.is_empty() {
                    return Err(ActionParseError::EmptyVariableName { position: w + 1 });
                }
                (var_name.to_string(), true)
            } else {
                ((*word).to_string(), false)
            };
            if is_var && param.force_const {
                return Err(ActionParseError::VariableNotAllowed {
                    position: w + 1,
                    arg: (*word).to_string(),
                    param: param.name.to_string(),
                });
            }
            args.push(arg);
            arg_is_var.push(is_var);
        }

        let mut call = Self {
            kind: action.kind,
            name: action.name,
            args,
            arg_is_var,
            parent_event: None,
            runner: action.runner,
            code: None,
        };
        if let Some(loader) = action.loader {
            loader(&mut call, ctx)?;
        }
        Ok(call)
    }

    pub fn is_native(&self) -> bool {
        self.code.is_some()
    }

    /// Runs the call. Only `if` returns a meaningful value.
    pub fn run(&self, world: &mut MobWorld, mob: MobId, payload: &EventPayload) -> bool {
        if let Some(code) = self.code {
            code(world, mob, payload);
            return false;
        }
        let Some(runner) = self.runner else {
            return false;
        };
        let Some(m) = world.mob(mob) else {
            return false;
        };
        let args = self
            .args
            .iter()
            .zip(&self.arg_is_var)
            .map(|(arg, is_var)| {
                if *is_var {
                    m.var(arg).to_string()
                } else {
                    arg.clone()
                }
            })
            .collect();

        let mut data = ActionRunData {
            world,
            mob,
            args,
            payload,
            parent_event: self.parent_event,
            return_value: false,
        };
        runner(&mut data);
        data.return_value
    }
}
