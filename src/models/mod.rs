// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and validation helpers shared between UI and form logic.

pub mod cutoffs;
pub mod groups;
pub mod job;
pub mod test_config;
pub mod upload;
