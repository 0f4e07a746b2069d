pub mod app;
pub mod camera;
pub mod config;
pub mod history;
pub mod message;
pub mod storage;
pub mod theme;
pub mod voice;
