// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form sections structured for MVU-style updates.

pub mod cutoffs;
pub mod features;
pub mod group_queues;
pub mod uploads;
