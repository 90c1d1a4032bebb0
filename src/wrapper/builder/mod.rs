//! App wrapper provisioning.
//!
//! - [`stage`] - the provisioning state machine
//! - [`orchestrator`] - [`Provisioner`], which runs the stages
//! - [`tool_detection`] - external tool availability checking

mod orchestrator;
mod stage;
mod tool_detection;

pub use orchestrator::Provisioner;
pub use stage::Stage;
pub use tool_detection::{Interpreter, detect_interpreter};
