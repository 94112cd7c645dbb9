pub mod swiss;

pub use swiss::{GeneratedRound, generate_round};
