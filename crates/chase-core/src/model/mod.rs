pub mod coords;
pub mod station;
pub mod ticket;
