pub mod cancel_exit;
pub mod checkpoint;
pub mod configure;
pub mod deposit;
pub mod emergency_exit;
pub mod fund_rewards;
pub mod initialize_pool;
pub mod initialize_staker;
pub mod process_exit;
pub mod request_exit;
pub mod views;

pub use cancel_exit::*;
pub use checkpoint::*;
pub use configure::*;
pub use deposit::*;
pub use emergency_exit::*;
pub use fund_rewards::*;
pub use initialize_pool::*;
pub use initialize_staker::*;
pub use process_exit::*;
pub use request_exit::*;
pub use views::*;
