//! Inspection-detail pages: the record type and its HTML parser.

pub mod labels;
pub mod model;
pub mod parser;

pub use model::{
    AdvanceNotice, CaseStatus, Inspection, InspectionType, LabelValue, Ownership,
    SafetyOrHealth, Scope, UnionStatus, NULL_INT, NULL_STRING,
};
pub use parser::{case_status, parse_inspection};
