//! Value objects - immutable types that represent domain concepts

mod policy;
mod table_name;

pub use policy::{
    PolicyProfile, QueryPolicy, BASE_DENYLIST, DEFAULT_ALLOWED_OPERATIONS,
    DEFAULT_MAX_QUERY_LENGTH, LIMIT_CEILING, STRICT_EXTRA_DENYLIST,
};
pub use table_name::{is_safe_identifier, TableName};
