pub mod app;
pub mod cli;
pub mod core;
pub mod launcher;
pub mod screens;
pub mod tui;
pub mod utils;
pub mod widgets;
