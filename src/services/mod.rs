pub mod assistant;
pub mod tickets;
