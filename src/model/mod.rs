pub mod poll;
pub mod response;
pub mod slot_table;
pub mod view;

/// Relationship mask, bit `i` ⇔ the entity at ordinal `i`.
pub type LinkMask = u64;
