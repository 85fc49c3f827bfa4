pub mod choice;
pub mod complete_word;
pub mod exercise;
pub mod normalize;
pub mod pacing;
pub mod pairs;
pub mod picture;
pub mod progress;
pub mod resolve;
pub mod supervisor;
pub mod typed;

pub use exercise::{Exercise, ExerciseContext, Outcome, PRIORITY, dispatch};
pub use supervisor::{SessionState, Supervisor};
