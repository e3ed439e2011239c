use std::collections::BTreeSet;

use thiserror::Error;

use super::action::ActionKind;
use super::call::ActionCall;

/// Problems with the shape of an action list as a whole. These are reported
/// but the list is still used as loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionStructureError {
    #[error("Found an \"else\" action without a matching \"if\" action!")]
    UnmatchedElse,
    #[error("Found an \"end_if\" action without a matching \"if\" action!")]
    UnmatchedEndIf,
    #[error("Some \"if\" actions don't have a matching \"end_if\" action!")]
    UnclosedIf,
    #[error("There are multiple labels called \"{0}\"!")]
    DuplicateLabel(String),
    #[error("There is no label called \"{0}\", even though there are \"goto\" actions that need it!")]
    UnknownLabel(String),
    #[error(
        "There is an action \"{0}\" placed after a \"set_state\" action, which means it will never get run!"
    )]
    UnreachableAction(String),
}

/// Checks if/else/end_if nesting, label and goto pairing, and that nothing
/// follows a `set_state` in the same branch.
pub fn assert_actions(actions: &[ActionCall]) -> Vec<ActionStructureError> {
    let mut errors = Vec::new();

    let mut if_level = 0usize;
    for call in actions {
        match call.kind {
            ActionKind::If => if_level += 1,
            ActionKind::Else if if_level == 0 => errors.push(ActionStructureError::UnmatchedElse),
            ActionKind::EndIf if if_level == 0 => {
                errors.push(ActionStructureError::UnmatchedEndIf)
            }
            ActionKind::EndIf => if_level -= 1,
            _ => {}
        }
    }
    if if_level > 0 {
        errors.push(ActionStructureError::UnclosedIf);
    }

    let mut labels = BTreeSet::new();
    for call in actions.iter().filter(|call| call.kind == ActionKind::Label) {
        if !labels.insert(call.args[0].as_str()) {
            errors.push(ActionStructureError::DuplicateLabel(call.args[0].clone()));
        }
    }
    for call in actions.iter().filter(|call| call.kind == ActionKind::Goto) {
        if !labels.contains(call.args[0].as_str()) {
            errors.push(ActionStructureError::UnknownLabel(call.args[0].clone()));
        }
    }

    let mut passed_set_state = false;
    for call in actions {
        match call.kind {
            ActionKind::SetState => passed_set_state = true,
            ActionKind::Else | ActionKind::EndIf | ActionKind::Label => passed_set_state = false,
            _ if passed_set_state => {
                errors.push(ActionStructureError::UnreachableAction(call.name.to_string()));
                passed_set_state = false;
            }
            _ => {}
        }
    }

    errors
}
