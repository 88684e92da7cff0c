pub mod aggregate;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod resample;
pub mod score;
pub mod state;
pub mod storage;
pub mod window;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
