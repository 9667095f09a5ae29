pub mod ride_archive;
pub mod ride_progress;
