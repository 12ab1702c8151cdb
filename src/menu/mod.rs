//! Numbered text menu over the calculator operations.

mod choice;
mod session;

pub use choice::MenuChoice;
pub use session::run_menu;
