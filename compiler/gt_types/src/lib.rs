//! Type system for Gentee.
//!
//! - [`resolve_type`]: dotted type names to descriptors, memoizing
//!   `arr.<T>`/`map.<T>` per unit namespace
//! - [`compare_types`] / [`is_equal_types`]: assignability, with open
//!   containers and the hidden `any` acting as wildcards
//! - [`select_overload`]: best-scoring function for a list of argument types
//! - [`new_workspace`]: a workspace whose unit 0 is the standard library

mod compat;
mod overload;
mod resolve;
mod stdlib;

pub use compat::{compare_types, describe_types, is_equal_types, type_name, TypeMatch};
pub use overload::{select_overload, variadic_elem};
pub use resolve::{func_type, resolve_type, Container};
pub use stdlib::{new_workspace, EMBEDDED};

#[cfg(test)]
mod tests;
