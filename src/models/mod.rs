pub mod cycle;
pub mod endpoint;
pub mod status;
