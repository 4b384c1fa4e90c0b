mod state_handler;

pub use state_handler::*;
