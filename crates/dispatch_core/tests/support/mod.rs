pub mod fleet;
pub mod world;
