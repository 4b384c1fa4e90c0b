mod sub_region_handler;

pub use sub_region_handler::*;
