pub use super::kv_record::Entity as KvRecord;
