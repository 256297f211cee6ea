pub mod stats_box;
pub mod typing_area;
