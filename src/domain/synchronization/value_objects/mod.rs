pub mod category;
pub mod credentials;
pub mod stage_outcome;
pub mod sync_config;
pub mod sync_event;
pub mod sync_request;
