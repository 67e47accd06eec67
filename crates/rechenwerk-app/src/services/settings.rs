// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Environment-driven settings resolution.

use std::path::{Path, PathBuf};

use rechenwerk_core::EngineConfig;
use rechenwerk_core::error::Result;
use tracing::debug;

/// Path of the JSON engine configuration.
pub const CONFIG_ENV: &str = "RECHENWERK_CONFIG";
/// Path of the JSON plan for headless runs.
pub const PLAN_ENV: &str = "RECHENWERK_PLAN";

pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV).map(PathBuf::from)
}

pub fn plan_path() -> Option<PathBuf> {
    std::env::var_os(PLAN_ENV).map(PathBuf::from)
}

/// Engine configuration from `$RECHENWERK_CONFIG`, or defaults when unset.
pub fn engine_config() -> Result<EngineConfig> {
    load_config(config_path().as_deref())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading engine config");
            EngineConfig::load(path)
        }
        None => Ok(EngineConfig::default()),
    }
}
