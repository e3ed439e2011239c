mod action;
mod call;
pub mod codes;
pub mod coerce;
mod event;
mod loaders;
pub mod runners;
mod validate;

pub use action::{
    ActionKind, ActionLoadContext, ActionLoader, ActionParam, ActionRegistry, ActionRunData,
    ActionRunner, MobAction, NativeAction, ParamType,
};
pub use call::{ActionCall, ActionParseError};
pub use event::{EventPayload, HitboxInteraction, MobEvent};
pub use validate::{assert_actions, ActionStructureError};
