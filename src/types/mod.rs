pub mod freshness;
pub mod measurement;
pub mod sensor;
pub mod station;
