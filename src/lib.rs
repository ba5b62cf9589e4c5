pub mod config;
pub mod dom;
pub mod endpoint;
pub mod errors;
pub mod event;
pub mod favorite;
pub mod models;
pub mod notice;
pub mod page;
pub mod panel;
pub mod storage;
pub mod text_reveal;
pub mod ui;

pub use config::Config;
pub use endpoint::{FavoriteEndpoint, HttpEndpoint};
pub use errors::AppError;
pub use page::Page;
pub use storage::{load_page, persist_page};
