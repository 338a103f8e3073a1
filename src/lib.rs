pub mod aggregate;
pub mod cli;
pub mod error;
pub mod export;
pub mod hours;
pub mod loader;
pub mod model;
pub mod projects;
pub mod scale;
pub mod scatter;
pub mod story;
pub mod summary;
pub mod timeline;
pub mod tui;
pub mod util;
