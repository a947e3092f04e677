pub mod adapters;
pub mod app_state;
pub mod commands;
pub mod config;
pub mod confluence;
pub mod db;
pub mod error;
pub mod jobs;
pub mod resolvers;
pub mod services;

pub use app_state::AppState;
pub use config::AppConfig;
pub use error::{VideoError, VideoResult};
