pub mod builder;
pub mod condition;
pub mod join;

pub use builder::{FacetedResults, QueryBuilder, QueryOutcome, PARENT_SELECTOR};
pub use condition::{build_condition, escape_value, format_condition, Condition};
pub use join::JoinConditions;
