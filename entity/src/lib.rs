//! `SeaORM` Entity definitions.

pub mod prelude;

pub mod kv_record;
