pub mod target;
pub mod types;
pub mod value;
