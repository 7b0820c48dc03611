// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the blob properties API
//!
//! This crate provides the record types that are shared between the blob client
//! and the HTTP server, avoiding circular dependencies.

pub mod property;

pub use property::{PropertyRecord, PropertyRecordError};
