pub mod buffer;
pub mod frames;
pub mod peak;
pub mod window;
