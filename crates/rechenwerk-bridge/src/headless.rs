// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless bridge for scripted and CI runs.
//
// The plan comes from a JSON file; results go to the tracing subscriber.

use std::path::PathBuf;

use rechenwerk_core::error::{RechenError, Result};
use rechenwerk_core::human_errors::{HumanError, Severity};
use rechenwerk_core::{ProcessingPlan, RunOutcome, fs};
use tracing::{error, info, warn};

use crate::traits::{Bridge, OutcomeReporter, PlanSource};

/// Bridge that reads its plan from disk and logs the outcome.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBridge {
    plan_file: Option<PathBuf>,
}

impl HeadlessBridge {
    /// A bridge with no plan to offer.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            plan_file: Some(path.into()),
        }
    }
}

impl Bridge for HeadlessBridge {
    fn name(&self) -> &str {
        "headless"
    }
}

impl PlanSource for HeadlessBridge {
    fn obtain_plan(&self) -> Result<Option<ProcessingPlan>> {
        let Some(path) = &self.plan_file else {
            warn!("no plan file configured");
            return Ok(None);
        };
        let bytes = fs::read(path)?;
        let plan: ProcessingPlan = serde_json::from_slice(&bytes)
            .map_err(|e| RechenError::Bridge(format!("invalid plan in {}: {e}", path.display())))?;
        info!(
            plan = %path.display(),
            input = %plan.input.display(),
            direction = ?plan.direction,
            "plan loaded"
        );
        Ok(Some(plan))
    }
}

impl OutcomeReporter for HeadlessBridge {
    fn report_success(&self, outcome: &RunOutcome) {
        for artifact in &outcome.artifacts {
            info!(
                path = %artifact.path.display(),
                role = ?artifact.role,
                sha256 = %artifact.sha256,
                "artifact"
            );
        }
        info!(artifacts = outcome.artifacts.len(), "run complete");
    }

    fn report_failure(&self, human: &HumanError) {
        match human.severity {
            Severity::Transient => warn!(
                suggestion = %human.suggestion,
                retriable = human.retriable,
                "{}",
                human.message
            ),
            Severity::ActionRequired | Severity::Permanent => error!(
                suggestion = %human.suggestion,
                retriable = human.retriable,
                "{}",
                human.message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rechenwerk_core::{Direction, FormatTag, TransformStep};

    use super::*;

    #[test]
    fn empty_bridge_has_no_plan() {
        assert!(HeadlessBridge::empty().obtain_plan().unwrap().is_none());
    }

    #[test]
    fn plan_file_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, r#"{"input": "in.txt", "output": "out.json"}"#).unwrap();

        let plan = HeadlessBridge::from_file(&path).obtain_plan().unwrap().unwrap();
        assert_eq!(plan, ProcessingPlan::forward("in.txt", "out.json"));
    }

    #[test]
    fn plan_file_with_every_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        std::fs::write(
            &path,
            r#"{
                "input": "in.dat",
                "output": "out.xml",
                "input_format": "yaml",
                "post": ["encrypt", "archive"],
                "direction": "forward"
            }"#,
        )
        .unwrap();

        let plan = HeadlessBridge::from_file(&path).obtain_plan().unwrap().unwrap();
        assert_eq!(plan.input_format, Some(FormatTag::Yaml));
        assert_eq!(plan.post, vec![TransformStep::Encrypt, TransformStep::Archive]);
        assert_eq!(plan.direction, Direction::Forward);
    }

    #[test]
    fn malformed_plan_is_a_bridge_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, r#"{"input": "in.txt", "direction": "sideways"}"#).unwrap();

        assert!(matches!(
            HeadlessBridge::from_file(&path).obtain_plan(),
            Err(RechenError::Bridge(_))
        ));
    }

    #[test]
    fn missing_plan_file_is_an_io_error() {
        let bridge = crate::headless_bridge(Some(PathBuf::from("/definitely/not/plan.json")));
        assert_eq!(bridge.name(), "headless");
        assert!(matches!(bridge.obtain_plan(), Err(RechenError::Io { .. })));
    }
}
