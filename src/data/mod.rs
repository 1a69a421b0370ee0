//! Persistence layer.
//!
//! `kv` provides the tag-namespaced key-value store and its two backends. The
//! repositories on top of it map domain records to their composite keys, so services
//! never build keys themselves.

pub mod kv;
pub mod poll;
pub mod response;

#[cfg(test)]
mod test;
