// Core modules implementing type resolution, binding, instances, relations and errors.
pub mod bind;
pub mod context;
pub mod cursor;
pub mod encode;
pub mod error;
pub mod instance;
pub mod plan;
pub mod relation;
pub mod scalar;
pub mod select;
pub mod types;
pub mod validate;
pub mod value;
