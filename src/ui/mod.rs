pub mod charts;
pub mod panels;
pub mod summary;
pub mod table;
