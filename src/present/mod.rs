pub mod compile;
pub mod sink;
