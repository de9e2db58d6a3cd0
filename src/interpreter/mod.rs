mod interpreter;
mod reader;
mod value;

pub use interpreter::*;
pub use reader::*;
pub use value::*;
