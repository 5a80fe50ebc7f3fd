//! Homeostatic controller module
pub mod feedback;
pub mod homeostasis;

pub use self::feedback::FeedbackWindow;
pub use self::homeostasis::{ComplexityAdjustment, HomeostaticController};
