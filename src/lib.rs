pub mod config;
pub mod constants;
pub mod dock;
pub mod error;
pub mod frame;
pub mod input;
pub mod sheet;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use error::{Rejected, Result, UiError};
pub use ui::Ui;
