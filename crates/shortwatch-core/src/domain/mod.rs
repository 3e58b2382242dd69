mod models;
mod symbol;

pub use models::ShortInterest;
pub use symbol::{Symbol, SymbolPolicy};
