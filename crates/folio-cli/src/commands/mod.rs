pub mod dispatch;
pub mod load;
pub mod rebuild;
pub mod search;
pub mod stats;
