use std::io::{Cursor, Write};

use itertools::Itertools;
use tracing::{debug, info};

use crate::config::Config;
use crate::dispatch::{Dispatcher, HandledOutcome};
use crate::error::CatalogError;
use crate::operations;
use crate::signal::OperationResult;

/// One catalog entry: an operation paired with the input that trips it.
#[derive(Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub summary: &'static str,
    pub run: fn(&Config) -> OperationResult<String>,
}

/// Fixed run order.
pub static SCENARIOS: [Scenario; 12] = [
    Scenario {
        name: "open-and-read-file",
        summary: "read a file that does not exist",
        run: open_and_read_file,
    },
    Scenario {
        name: "open-input-stream",
        summary: "open a buffered stream on a missing file",
        run: open_input_stream,
    },
    Scenario {
        name: "read-past-end-of-stream",
        summary: "read a 4-byte record from a 2-byte stream",
        run: read_past_end_of_stream,
    },
    Scenario {
        name: "connect-to-external-resource",
        summary: "connect to a malformed tcp:// target",
        run: connect_to_external_resource,
    },
    Scenario {
        name: "load-named-type",
        summary: "look up an unregistered type name",
        run: load_named_type,
    },
    Scenario {
        name: "divide",
        summary: "divide 10 by 0",
        run: divide,
    },
    Scenario {
        name: "dereference-null",
        summary: "take the length of an absent string",
        run: dereference_null,
    },
    Scenario {
        name: "index-access",
        summary: "read index 5 of [1, 2, 3]",
        run: index_access,
    },
    Scenario {
        name: "type-cast",
        summary: "cast a String to i32",
        run: type_cast,
    },
    Scenario {
        name: "set-priority",
        summary: "set a priority outside 1..=10",
        run: set_priority,
    },
    Scenario {
        name: "parse-integer",
        summary: "parse \"InvalidNumber\" as an integer",
        run: parse_integer,
    },
    Scenario {
        name: "custom-validation",
        summary: "fail a caller-defined precondition",
        run: custom_validation,
    },
];

fn open_and_read_file(config: &Config) -> OperationResult<String> {
    operations::open_and_read_file(&config.missing_file)
}

fn open_input_stream(config: &Config) -> OperationResult<String> {
    operations::open_input_stream(&config.missing_file)
}

fn read_past_end_of_stream(_: &Config) -> OperationResult<String> {
    operations::read_from_stream(Cursor::new([0xCA_u8, 0xFE])).map(|record| record.to_string())
}

fn connect_to_external_resource(config: &Config) -> OperationResult<String> {
    operations::connect_to_external_resource(&config.connect_target, config.connect_timeout())
        .map(|peer| peer.to_string())
}

fn load_named_type(config: &Config) -> OperationResult<String> {
    operations::load_named_type(&config.type_name).map(|descriptor| descriptor.to_string())
}

fn divide(_: &Config) -> OperationResult<String> {
    operations::divide(10, 0).map(|quotient| quotient.to_string())
}

fn dereference_null(_: &Config) -> OperationResult<String> {
    operations::dereference_null(None).map(|len| len.to_string())
}

fn index_access(_: &Config) -> OperationResult<String> {
    operations::index_access(&[1, 2, 3], 5).map(|item| item.to_string())
}

fn type_cast(_: &Config) -> OperationResult<String> {
    let value = String::from("This is a string");
    operations::type_cast::<i32>(&value).map(|number| number.to_string())
}

fn set_priority(config: &Config) -> OperationResult<String> {
    operations::set_priority(config.priority).map(|priority| priority.to_string())
}

fn parse_integer(_: &Config) -> OperationResult<String> {
    operations::parse_integer("InvalidNumber").map(|number| number.to_string())
}

fn custom_validation(_: &Config) -> OperationResult<String> {
    operations::custom_validation(false, "This is a custom exception!")
        .map(|()| "valid".to_string())
}

// =============================================================================
// Lookup and driving
// =============================================================================

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

/// Scenarios named in `names`, in catalog order. An empty list selects all.
pub fn select(names: &[String]) -> Result<Vec<&'static Scenario>, CatalogError> {
    if let Some(unknown) = names.iter().find(|name| find(name).is_none()) {
        return Err(CatalogError::UnknownScenario {
            name: unknown.clone(),
            available: SCENARIOS.iter().map(|scenario| scenario.name).join(", "),
        });
    }
    Ok(SCENARIOS
        .iter()
        .filter(|scenario| names.is_empty() || names.iter().any(|name| name == scenario.name))
        .collect())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub handled: usize,
    pub succeeded: usize,
}

/// Run each scenario through the dispatcher, one after the other.
pub fn run_all<W: Write>(
    scenarios: &[&Scenario],
    config: &Config,
    dispatcher: &mut Dispatcher<W>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for scenario in scenarios {
        debug!(scenario = scenario.name, "running");
        summary.total += 1;
        match dispatcher.handle((scenario.run)(config)) {
            HandledOutcome::Ok(value) => {
                info!(scenario = scenario.name, %value, "completed without failure");
                summary.succeeded += 1;
            }
            HandledOutcome::Handled(_) => summary.handled += 1,
        }
    }
    info!(
        total = summary.total,
        handled = summary.handled,
        succeeded = summary.succeeded,
        "run finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FailureKind;
    use std::collections::HashSet;
    use tempfile::NamedTempFile;

    fn run_to_string(scenarios: &[&Scenario], config: &Config) -> (RunSummary, String) {
        let mut dispatcher = Dispatcher::new(Vec::new());
        let summary = run_all(scenarios, config, &mut dispatcher);
        (summary, String::from_utf8(dispatcher.into_sink()).unwrap())
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = SCENARIOS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SCENARIOS.len());
    }

    #[test]
    fn test_each_scenario_fails_with_its_own_origin() {
        let config = Config::default();
        for scenario in &SCENARIOS {
            let signal = (scenario.run)(&config).unwrap_err();
            assert_eq!(signal.origin(), scenario.name);
        }
    }

    #[test]
    fn test_expected_kinds() {
        let config = Config::default();
        let expected = [
            ("open-and-read-file", FailureKind::ResourceNotFound),
            ("open-input-stream", FailureKind::ResourceNotFound),
            ("read-past-end-of-stream", FailureKind::EndOfStream),
            ("connect-to-external-resource", FailureKind::MalformedInput),
            ("load-named-type", FailureKind::ResourceNotFound),
            ("divide", FailureKind::InvalidArgument),
            ("dereference-null", FailureKind::InvalidState),
            ("index-access", FailureKind::OutOfRange),
            ("type-cast", FailureKind::InvalidTypeConversion),
            ("set-priority", FailureKind::InvalidArgument),
            ("parse-integer", FailureKind::MalformedInput),
            ("custom-validation", FailureKind::DomainSpecific),
        ];
        for (name, kind) in expected {
            let scenario = find(name).unwrap();
            assert_eq!((scenario.run)(&config).unwrap_err().kind(), kind, "{}", name);
        }
    }

    #[test]
    fn test_full_run_reports_one_line_per_scenario() {
        let all = select(&[]).unwrap();
        let (summary, output) = run_to_string(&all, &Config::default());
        assert_eq!(summary.total, 12);
        assert_eq!(summary.handled, 12);
        assert_eq!(summary.succeeded, 0);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|line| line.contains(" caught: ")));
        assert_eq!(lines[5], "invalid-argument caught: division by zero");
        assert_eq!(lines[11], "domain-specific caught: This is a custom exception!");
    }

    #[test]
    fn test_config_can_defuse_environmental_triggers() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            missing_file: file.path().to_path_buf(),
            type_name: "String".to_string(),
            priority: 5,
            ..Config::default()
        };
        let selected = select(&[
            "open-and-read-file".to_string(),
            "load-named-type".to_string(),
            "set-priority".to_string(),
        ])
        .unwrap();
        let (summary, output) = run_to_string(&selected, &config);
        assert_eq!(summary.succeeded, 3);
        assert!(output.is_empty());
    }

    #[test]
    fn test_select_keeps_catalog_order() {
        let selected = select(&["parse-integer".to_string(), "divide".to_string()]).unwrap();
        let names: Vec<&str> = selected.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["divide", "parse-integer"]);
    }

    #[test]
    fn test_select_unknown_name() {
        let err = select(&["explode".to_string()]).unwrap_err();
        match err {
            CatalogError::UnknownScenario { name, available } => {
                assert_eq!(name, "explode");
                assert!(available.starts_with("open-and-read-file, "));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
