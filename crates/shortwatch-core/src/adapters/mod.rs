//! Provider adapters for the short-interest lookup contract.

mod yahoo;

pub use yahoo::{YahooAuthManager, YahooProvider};
