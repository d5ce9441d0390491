pub mod pool;
pub mod staker;
pub mod withdrawal_request;

pub use pool::*;
pub use staker::*;
pub use withdrawal_request::*;
