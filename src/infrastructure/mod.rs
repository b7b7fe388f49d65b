pub mod ghtk_client;
pub mod memory;
pub mod models;
pub mod order_repo;
pub mod settings_repo;
