//! Cane Registry Library
//!
//! Validated entity repositories for the sugar-cane district back office:
//! associations, planters, sugar mills, user profiles and valid ID types.

pub mod config;
pub mod core;
pub mod modules;
pub mod repository;
pub mod store;

// Re-export commonly used types
pub use modules::associations;
pub use modules::planters;
pub use modules::sugar_mills;
pub use modules::user_profiles;
pub use modules::valid_id_types;
