pub mod event;
pub mod manager;
pub mod session;
#[cfg(test)]
pub mod session_test;
pub mod target;
pub mod tracker;
#[cfg(test)]
pub mod tracker_test;
