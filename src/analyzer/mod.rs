mod scope;
mod semantic_analyzer;
mod symbol_table;
mod ty;

pub use semantic_analyzer::*;
pub use symbol_table::*;
pub use ty::*;
