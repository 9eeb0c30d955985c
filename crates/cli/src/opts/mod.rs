mod ethereum;
mod paths;
mod transaction;

pub use ethereum::*;
pub use paths::*;
pub use transaction::*;
