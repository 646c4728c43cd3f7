mod document;
mod flatten;
mod value;

pub use document::*;
pub use flatten::*;
pub use value::*;
