pub mod authenticator;
pub mod download_stage;
pub mod notifier;
pub mod repository;
pub mod sync_plan;
pub mod value_objects;
