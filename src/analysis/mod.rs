pub mod error;
pub mod trend;
