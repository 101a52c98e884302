pub mod context;
pub mod logger;
pub mod registry;
