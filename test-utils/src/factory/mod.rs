//! Factory methods for creating test data.
//!
//! Factories insert raw rows with sensible defaults, reducing boilerplate in tests that
//! need pre-existing persisted state (for example, a record written by an older process).
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let record = factory::kv_record::KvRecordFactory::new(&db)
//!         .key("vote_1_Lunch")
//!         .value(serde_json::json!({ "closed": true }))
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod helpers;
pub mod kv_record;
