// In src/lib.rs
pub mod common;
pub mod domain;
pub mod infrastructure {
    pub mod db;
    pub mod mq;
    pub mod notification;
    pub mod sync_engine;
    // Re-export
    pub use sync_engine::init_orchestrator;
    pub use sync_engine::orchestrator;
    pub use sync_engine::orchestrator::commands;
    pub use sync_engine::orchestrator_proxy::SyncHandle;
}
