pub mod matches;
pub mod participants;
pub mod rounds;
pub mod tournaments;

pub use matches::{ResultReport, confirm_result, dispute, report_result, reset_result};
pub use rounds::{complete_round, start_round};
