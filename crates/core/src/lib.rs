// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ll-core: Shared library for the liftlog workout tracker
//!
//! This crate provides the document model and write semantics, queued
//! mutation records, the workout and performance model, durable local
//! storage, and the wire protocol used by both the liftlog client and the
//! ll-remote document server.

pub mod clock;
pub mod document;
pub mod error;
pub mod mutation;
pub mod perf;
pub mod protocol;
pub mod store;
pub mod workout;

pub use clock::{iso8601, ClockSource, ManualClock, SystemClock};
pub use document::{Document, DocumentRef, DocumentStore, FieldPath, FieldWrite};
pub use error::{Error, Result};
pub use mutation::{MutationId, MutationKind, MutationRecord};
pub use perf::{
    DayPerformance, ExercisePerformance, Performance, SessionSummary, SetField, SetPerformance,
};
pub use protocol::{ClientMessage, ErrorCode, ServerMessage};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use workout::{Exercise, ExerciseType, Workout, WorkoutDraft, WorkoutPatch};
