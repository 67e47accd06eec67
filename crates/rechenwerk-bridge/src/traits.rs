// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator-facing trait definitions.

use rechenwerk_core::error::Result;
use rechenwerk_core::human_errors::HumanError;
use rechenwerk_core::{ProcessingPlan, RunOutcome};

/// Everything a driver provides, grouped.
pub trait Bridge: PlanSource + OutcomeReporter {
    /// Short name for logs (e.g. "headless").
    fn name(&self) -> &str;
}

/// Supplies the plan for a run.
pub trait PlanSource {
    /// Returns `Ok(None)` when the driver has nothing to run.
    fn obtain_plan(&self) -> Result<Option<ProcessingPlan>>;
}

/// Receives the result of a run.
pub trait OutcomeReporter {
    fn report_success(&self, outcome: &RunOutcome);

    fn report_failure(&self, error: &HumanError);
}
