pub mod csv_seed;
pub mod repo;
