pub mod actions;
pub mod components;
pub mod layout;
pub mod model;
pub mod network;
pub mod reducer;
pub mod session;
pub mod subscription;
pub mod timer;
pub mod transformers;
pub mod types;
pub mod view;
