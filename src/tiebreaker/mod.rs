pub mod context;
pub mod functions;

pub use context::{Encounter, Record, TiebreakerContext};
pub use functions::compute;
