//! # Services
//!
//! Multi-step operations shared by handlers. Each service is written
//! against the store traits so it can be exercised without a database.

pub mod billing;
