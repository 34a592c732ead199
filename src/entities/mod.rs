//! Entity type definitions

pub mod exigence;
pub mod operation;
pub mod order;

pub use exigence::{ChecklistItem, ChecklistItemKind, Exigence, SampleRule};
pub use operation::{ChecklistResponse, OperationRecord, ResponseValue, SampleScan};
pub use order::OrderConfig;
