pub mod hardware;
pub mod hid;
pub mod resources;
pub mod storage;
