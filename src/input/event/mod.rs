pub mod evdev;
pub mod native;
