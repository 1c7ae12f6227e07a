//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions of the optoken
//! crate, so that callers do not have to import each one individually.

// Codec and sanitizer
pub use crate::program::{
    Instruction, OpClass, ParsedProgram, PassthroughEntry, ProgramSet, Route, encode,
    encode_program, parse, sanitize, sanitize_set,
};

// Registry
pub use crate::registry::{
    Effect, OperationDescriptor, ParamField, ParamSlot, PostOpTag, RegistryIndex,
    ValidationIssue,
};

// Trees and change detection
pub use crate::tree::{
    ActionNode, EditCommand, EntityNode, InstructionField, MAX_PARAMS, NodeId, ProgramTree,
    Snapshot, TreeRow, build, is_unchanged,
};

// Commit and session
pub use crate::commit::{CommitCoordinator, CommitFailure, CommitOutcome, PostOp};
pub use crate::session::{EditorSession, LoadOutcome, SelectionToken};
pub use crate::store::{CommitRequest, KnownEntity, MemoryStore, ProgramStore, StoreFixture};

// Configuration and errors
pub use crate::config::{EditorConfig, MaintenancePolicy};
pub use crate::error::{ConfigError, EditError, EditorError, ParseWarning, StoreError};

// Hash set used for known-entity lookups
pub use ahash::AHashSet;
