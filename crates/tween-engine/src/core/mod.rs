pub mod config;
pub mod error;
pub mod interp;
pub mod registry;
pub mod tween;
