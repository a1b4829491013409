pub mod aggregation;
pub mod simplification;
pub mod summary;
