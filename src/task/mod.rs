pub mod measure;
pub mod usb;
