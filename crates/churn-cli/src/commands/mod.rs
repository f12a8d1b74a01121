//! Command handlers. Each translates parsed arguments into core calls and
//! reports the outcome; no business logic lives here.

pub mod completions;
pub mod scaffold;
