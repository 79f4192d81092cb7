mod message;
mod session;
mod theme;

pub use message::{Message, Role};
pub use session::Session;
pub use theme::ThemeMode;
