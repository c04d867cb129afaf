pub mod chunks;
pub mod grid;
