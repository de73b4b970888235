pub mod app;
pub mod controller;
pub mod event;
pub mod input;
pub mod renderer;
pub mod utils;

pub use app::ChooserApp;
pub use controller::TuiChooser;
pub use event::{Event, EventHandler};
pub use input::InputHandler;
pub use renderer::Renderer;
