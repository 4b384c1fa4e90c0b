mod sub_region;

pub use sub_region::SubRegion;
