mod sub_region_service;

pub use sub_region_service::SubRegionService;
