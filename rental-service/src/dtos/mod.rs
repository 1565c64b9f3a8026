mod fleet;
mod ledger;
mod rentals;
mod subscription;

pub use fleet::*;
pub use ledger::*;
pub use rentals::*;
pub use subscription::*;
