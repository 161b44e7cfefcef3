pub mod timestamp_store;
