mod ledger;
mod money;
mod period;
mod search;
mod transaction;

pub use ledger::*;
pub use money::*;
pub use period::*;
pub use search::*;
pub use transaction::*;
