pub mod driver;
pub mod path;
pub mod pose;
