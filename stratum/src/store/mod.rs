mod host;
mod memory;
mod registry;
mod settings_store;
mod sink;

pub use host::*;
pub use memory::*;
pub use registry::*;
pub use settings_store::*;
pub use sink::*;
