pub mod environment;
pub mod error;
pub mod execute;
pub mod process;

pub use environment::Environment;
pub use error::ExecError;
pub use execute::execute_node;
pub use process::{CaptureRunner, InheritRunner, Invocation, ProcessRunner};
