//! Interactive front end for the student roster.

pub mod prompt;
pub mod session;
pub mod table;

pub use prompt::{MenuChoice, PromptError, Prompter};
pub use session::{Exit, MENU, Session};
