pub mod config;
pub mod derive;
pub mod error;
pub mod feed;
pub mod frames;
pub mod persist;
pub mod state;
pub mod view;
