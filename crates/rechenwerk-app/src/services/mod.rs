// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges collaborators to the rechenwerk backend crates.
//
// `api` is the surface collaborators call; `chain` drives the processor and
// the protective transforms for one plan; `settings` resolves configuration
// from the environment.

pub mod api;
pub mod chain;
pub mod settings;
