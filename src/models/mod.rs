pub mod log;
pub mod onboarding;
pub mod routine;

pub use log::{LoggedExercise, WorkoutLog};
pub use onboarding::{
  ExperienceLevel, OnboardingProfile, PhysicalStats, PreviousRoutineReference, RoutineRequest,
  Timestamp,
};
pub use routine::{DailyWorkouts, Exercise, GeneratedRoutine, Weekday};
