pub mod scheduler;
pub mod trip_id;
