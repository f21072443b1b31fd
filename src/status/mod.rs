pub mod check;
pub mod client;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod poller;
pub mod retry;
