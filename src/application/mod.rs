// Application layer - the ledger service owned by whichever front end runs it.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
