pub mod balance;
pub mod node;
pub mod transaction;

pub use balance::{AddressBalance, TokenBalance};
pub use node::NodeStatus;
pub use transaction::{DateWindow, TransactionRecord, TransactionStats};
