pub mod cores;
pub mod fields;

pub use cores::CoreAdmin;
pub use fields::{BatchReport, FieldAction, FieldOutcome, FieldStatus, FieldsAdmin};
