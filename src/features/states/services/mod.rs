mod state_service;

pub use state_service::StateService;
