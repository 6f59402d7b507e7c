//! Shared containers and infrastructure for the voxlabel workspace.

pub mod bit_buffer3;
pub mod buffer3;
pub mod log_setup;
pub mod parallel;
pub mod test_utils;

pub use bit_buffer3::BitBuffer3;
pub use buffer3::Buffer3;
