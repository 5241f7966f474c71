pub mod accent_cache;
pub mod worker;
