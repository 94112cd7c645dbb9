pub mod calculator;

pub use calculator::calculate_standings;
