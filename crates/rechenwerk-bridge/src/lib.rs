// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rechenwerk-bridge — Seams between the engine and whatever drives it.
//
// A driver hands over one immutable `ProcessingPlan` and receives either a
// `RunOutcome` or a humanised error. The engine never asks the driver
// anything mid-run.

pub mod headless;
pub mod traits;

pub use headless::HeadlessBridge;
pub use traits::{Bridge, OutcomeReporter, PlanSource};

/// Bridge for non-interactive runs.
///
/// `plan_file` is the JSON-encoded plan to execute; `None` means there is
/// nothing to do.
pub fn headless_bridge(plan_file: Option<std::path::PathBuf>) -> Box<dyn Bridge> {
    match plan_file {
        Some(path) => Box::new(HeadlessBridge::from_file(path)),
        None => Box::new(HeadlessBridge::empty()),
    }
}
