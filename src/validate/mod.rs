//! Whole-config validation that reports every defect at once.
//!
//! Strict resolution and initial-state reduction both stop at the first
//! problem. [`validate`] instead runs a lenient resolution and checks the
//! `initial` of every compound node, active or not, accumulating all
//! findings with Stillwater's `Validation`.

use crate::core::{child_path, display_path, normalize, CanonicalStateNode, StateKind, StateNodeConfig};
use crate::initial::ReduceError;
use crate::options::CompileOptions;
use crate::registry::MachineOptions;
use crate::resolve::{resolve_with, ResolveError};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;
use tracing::debug;

/// A single defect found in a config.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigIssue {
    #[error(transparent)]
    Reference(#[from] ResolveError),

    #[error(transparent)]
    Initial(#[from] ReduceError),
}

/// Outcome of validating a config.
pub type ConfigValidation = Validation<(), NonEmptyVec<ConfigIssue>>;

/// Check `config` against `registry`, accumulating every issue.
///
/// # Example
///
/// ```rust
/// use statetree::core::StateNodeConfig;
/// use statetree::registry::MachineOptions;
/// use statetree::validate::validate;
/// use stillwater::validation::Validation;
///
/// let config: StateNodeConfig = serde_json::from_value(serde_json::json!({
///     "initial": "missing",
///     "entry": ["a", "b"],
///     "states": { "idle": {} }
/// }))
/// .unwrap();
/// let registry: MachineOptions<(), ()> = MachineOptions::new();
///
/// match validate(&config, &registry, "/") {
///     Validation::Failure(issues) => assert_eq!(issues.len(), 3),
///     Validation::Success(_) => panic!("expected issues"),
/// }
/// ```
pub fn validate<C, E>(
    config: &StateNodeConfig,
    registry: &MachineOptions<C, E>,
    delimiter: &str,
) -> ConfigValidation {
    let canonical = normalize(config);
    let options = CompileOptions::lenient().with_delimiter(delimiter);

    let mut checks: Vec<ConfigValidation> = Vec::new();

    match resolve_with(&canonical, registry, &options) {
        Ok(resolution) => {
            for issue in resolution.issues {
                checks.push(Validation::fail(ConfigIssue::from(issue)));
            }
        }
        // Lenient resolution does not fail; kept total in case it ever does.
        Err(error) => checks.push(Validation::fail(ConfigIssue::from(error))),
    }

    initial_checks(&canonical, delimiter, "", &mut checks);

    debug!(checks = checks.len(), "validated state config");

    Validation::all_vec(checks).map(|_| ())
}

fn initial_checks(
    node: &CanonicalStateNode,
    delimiter: &str,
    path: &str,
    checks: &mut Vec<ConfigValidation>,
) {
    let children = node.states().into_iter().flatten();

    if node.kind() == StateKind::Compound {
        let defined = node
            .initial()
            .is_some_and(|key| node.states().is_some_and(|states| states.contains_key(key)));
        let check = if defined {
            Validation::success(())
        } else {
            Validation::fail(ConfigIssue::Initial(ReduceError::UndefinedInitial {
                path: display_path(path, delimiter),
                key: node.initial().unwrap_or_default().to_string(),
            }))
        };
        checks.push(check);
    }

    for (key, child) in children {
        initial_checks(child, delimiter, &child_path(path, delimiter, key), checks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ReferenceKind;
    use serde_json::json;

    fn config(value: serde_json::Value) -> StateNodeConfig {
        serde_json::from_value(value).unwrap()
    }

    fn registry() -> MachineOptions<(), ()> {
        MachineOptions::new()
            .with_action("log", |_: &(), _: &()| ())
            .with_guard("ok", |_: &(), _: &()| true)
    }

    #[test]
    fn valid_config_succeeds() {
        let result = validate(
            &config(json!({
                "initial": "idle",
                "states": {
                    "idle": { "entry": "log", "on": { "GO": { "target": "busy", "guards": "ok" } } },
                    "busy": {}
                }
            })),
            &registry(),
            "/",
        );
        assert!(result.is_success());
    }

    #[test]
    fn validation_accumulates_all_issues() {
        let result = validate(
            &config(json!({
                "initial": "idle",
                "states": {
                    "idle": { "entry": "missing_action", "on": { "GO": "nowhere" } },
                    "busy": { "initial": "missing", "states": { "x": {} } }
                }
            })),
            &registry(),
            "/",
        );

        match result {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 3);
                let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
                assert!(messages.contains(&"Unresolved action reference 'missing_action' at '/idle'".to_string()));
                assert!(messages.contains(&"Unresolved target reference 'nowhere' at '/idle'".to_string()));
                assert!(messages.contains(&"Initial state 'missing' is not defined at '/busy'".to_string()));
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn inactive_branches_are_checked() {
        let result = validate(
            &config(json!({
                "type": "parallel",
                "states": {
                    "a": { "states": { "x": {} } },
                    "b": {}
                }
            })),
            &registry(),
            "/",
        );

        match result {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 1);
                let issue = issues.iter().next().unwrap();
                assert_eq!(
                    issue,
                    &ConfigIssue::Initial(ReduceError::UndefinedInitial {
                        path: "/a".into(),
                        key: String::new(),
                    })
                );
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn missing_initial_is_flagged_even_with_empty_key_child() {
        let result = validate(&config(json!({ "states": { "": {}, "a": {} } })), &registry(), "/");

        match result {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(
                    issues.iter().next().unwrap(),
                    &ConfigIssue::Initial(ReduceError::UndefinedInitial {
                        path: "/".into(),
                        key: String::new(),
                    })
                );
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn reference_issues_keep_their_kind() {
        let result = validate(
            &config(json!({ "always": { "guards": "nope" } })),
            &registry(),
            "/",
        );

        match result {
            Validation::Failure(issues) => {
                let first = issues.iter().next().unwrap();
                assert!(matches!(
                    first,
                    ConfigIssue::Reference(ResolveError::UnresolvedReference {
                        kind: ReferenceKind::Guard,
                        ..
                    })
                ));
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn custom_delimiter_shapes_issue_paths() {
        let result = validate(
            &config(json!({ "initial": "a", "states": { "a": { "exit": "gone" } } })),
            &registry(),
            ".",
        );

        match result {
            Validation::Failure(issues) => {
                let first = issues.iter().next().unwrap();
                assert_eq!(first.to_string(), "Unresolved action reference 'gone' at '.a'");
            }
            Validation::Success(_) => panic!("Expected validation failure"),
        }
    }
}
