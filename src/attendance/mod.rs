pub mod editor;
pub mod gate;
pub mod history;
pub mod session;
pub mod state;
