pub mod client;
pub mod errors;
pub mod store;
pub mod types;
pub mod utils;
