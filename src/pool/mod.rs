mod manager;

pub use manager::create_pool;
