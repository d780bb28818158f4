// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! UI-agnostic form core: enumeration, visibility, dynamic fields, validation
//! and the submit lifecycle.

pub mod barrier;
pub mod builder;
pub mod enumerator;
pub mod error;
pub mod session;
pub mod submission;
pub mod validate;
pub mod visibility;
