//! Synthetic export records composed from reference tables.

pub mod composer;
pub mod context;
/// Random hex identifiers.
pub mod ident;

pub use composer::{RecordComposer, RecordKind};
pub use context::{ReferenceContext, TableId};
