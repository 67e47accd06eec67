// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rechenwerk — headless runner.
//
// Entry point. Initialises logging, obtains a plan from the headless bridge
// (first argument, else `$RECHENWERK_PLAN`), runs it and reports the outcome.

use std::path::PathBuf;
use std::process::ExitCode;

use rechenwerk_app::services::{api, settings};
use rechenwerk_bridge::Bridge;
use rechenwerk_core::human_errors::humanize_error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Rechenwerk starting");

    let plan_file = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(settings::plan_path);
    let bridge = rechenwerk_bridge::headless_bridge(plan_file);

    execute(bridge.as_ref())
}

fn execute(bridge: &dyn Bridge) -> ExitCode {
    let plan = match bridge.obtain_plan() {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            tracing::info!(bridge = bridge.name(), "no plan supplied, nothing to do");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            bridge.report_failure(&humanize_error(&e));
            return ExitCode::FAILURE;
        }
    };

    match api::run(&plan) {
        Ok(outcome) => {
            bridge.report_success(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = %e, "run failed");
            bridge.report_failure(&humanize_error(&e));
            ExitCode::FAILURE
        }
    }
}
