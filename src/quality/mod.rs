pub mod hint;
pub mod selector;

pub use hint::{DEFAULT_POLICY, format_policy};
pub use selector::{RankedFormat, select_merged_formats};
