//! Scene management

mod camera;
mod camera_controller;
mod shared;

pub use camera::*;
pub use camera_controller::*;
pub use shared::*;
