//! The three interaction modes.

mod command;
mod inspector;
mod painter;

pub use command::CommandMode;
pub use inspector::InspectorMode;
pub use painter::PainterMode;
