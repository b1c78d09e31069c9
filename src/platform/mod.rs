pub mod capability;
pub mod signals;
