pub mod routine;

pub use routine::{generate_ai_routine, CallerContext};
