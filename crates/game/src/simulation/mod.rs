mod collision;
mod command;
mod stepper;

pub use collision::{CONTACT_ORDER, resolve_ball};
pub use command::{Action, BufferFull, Command, CommandBuffer, CommandKind, DEFAULT_COMMAND_CAPACITY};
pub use stepper::{DEFAULT_SUB_STEP_MS, advance, apply_command};
