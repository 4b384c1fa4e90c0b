mod country_dto;

pub use country_dto::*;
