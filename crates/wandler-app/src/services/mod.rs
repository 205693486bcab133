// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the Dioxus UI to the wandler backend crates.
//
// Conversions are blocking, so they run on a worker thread and report back
// to the UI through a channel.

pub mod app_services;
pub mod data_dir;
pub mod shell;
pub mod worker;
