mod sub_region_dto;

pub use sub_region_dto::*;
