//! Interactive fault demonstrations: a token reader that never gives up on
//! malformed input, the menu loop, and the eleven demonstrations it dispatches.

pub mod error;
pub mod menu;
pub mod operations;
pub mod pause;
pub mod reader;
pub mod records;
pub mod registry;

pub use error::{ConsoleError, ConsoleResult};
pub use menu::{run, MenuExit, MenuSummary};
pub use operations::Demonstrations;
pub use pause::{Interrupt, Pause, PauseOutcome};
pub use reader::{Console, Retry};
