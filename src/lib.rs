//! # optoken - Operation-Token Program Editor Core
//!
//! **optoken** is the editing core behind per-product inventory programs. Every product
//! carries one *program* per workflow route (activation, reduction, shipment): an ordered,
//! space-separated list of `CLASS:FUNCTION:TARGET[:PARAM]*` instructions. Programs are
//! stored as plain strings but edited as a tree of entity and action nodes; this crate
//! converts between the two without losing information.
//!
//! ## Core Workflow
//!
//! 1.  **Sanitize**: Drop every entry whose target is not a known entity, using [`program::sanitize`].
//! 2.  **Build**: Parse the route's program and group it into a [`tree::ProgramTree`], one entity node per target.
//! 3.  **Edit**: Apply [`tree::EditCommand`]s through the single reducer, `ProgramTree::apply`.
//! 4.  **Commit**: Let the [`commit::CommitCoordinator`] compare against the snapshot, encode, collect postops and persist.
//!
//! [`session::EditorSession`] wires these steps together on top of an injected
//! [`store::ProgramStore`].
//!
//! ## Quick Start
//!
//! ```rust
//! use optoken::prelude::*;
//!
//! let config = EditorConfig::default();
//! let known: AHashSet<String> = ["P1".to_string(), "P2".to_string()].into_iter().collect();
//!
//! // 1. Sanitize against the products the client knows.
//! let program = sanitize("AC:290W:P1 RD:10FD:P1:5 RD:10FD:P9:2", &known);
//! assert_eq!(program, "AC:290W:P1 RD:10FD:P1:5");
//!
//! // 2. Build the editable tree and take a baseline.
//! let mut tree = ProgramTree::from_program(&program, "P1", Route::Reduction, &config);
//! let snapshot = Snapshot::capture(&tree);
//!
//! // 3. Edit the second action's first parameter.
//! let action = tree.nodes()[0].actions[1].id;
//! tree.apply(EditCommand::SetInstructionField {
//!     node_id: action,
//!     field: InstructionField::Param(0),
//!     value: "7".to_string(),
//! })
//! .unwrap();
//!
//! // 4. The change is detected and encodes back to a program string.
//! assert!(!is_unchanged(&tree, &snapshot));
//! assert_eq!(encode_program(&tree, config.maintenance), "AC:290W:P1 RD:10FD:P1:7");
//! ```

pub mod commit;
pub mod config;
pub mod error;
pub mod prelude;
pub mod program;
pub mod registry;
pub mod session;
pub mod store;
pub mod tree;
