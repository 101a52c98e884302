pub mod batch;
pub mod client;
