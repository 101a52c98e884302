pub mod batch;
pub mod driver;
pub mod extract;
