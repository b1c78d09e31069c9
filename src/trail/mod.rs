pub mod path;
pub mod sim;
