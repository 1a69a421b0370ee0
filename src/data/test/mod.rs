mod kv_store;
mod poll;
mod response;
