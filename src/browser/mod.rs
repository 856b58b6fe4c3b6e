//! Browser session layer

pub mod chromium;
pub mod js_scripts;
pub mod session;

pub use chromium::{ChromiumLauncher, ChromiumSession};
pub use session::{BrowserSession, ButtonHandle, SessionLauncher};
