//! Nebot Test Utils
//!
//! Provides shared testing utilities for the bot's data layer. This crate offers a builder
//! pattern for creating test contexts with in-memory SQLite databases and customizable
//! table schemas, plus a factory for seeding key-value records.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Helpers for inserting raw `kv_record` rows
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::KvRecord;
//!
//! #[tokio::test]
//! async fn test_store_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(KvRecord)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
