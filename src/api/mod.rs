pub mod client;
pub mod payments;
