mod display;
mod window;

pub use display::DisplayEventHandler;
pub use window::WindowEventHandler;
