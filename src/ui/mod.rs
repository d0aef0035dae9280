pub mod app;
mod board;
mod dialogs;
mod rendering;
mod resources;
mod session;
mod sound;
