//! Calibration storage
//!
//! The calibration byte lives at the start of the last flash sector, which
//! the linker script must keep out of the program image. It is read once at
//! boot and never written by the firmware.

use aethersense::Calibration;
use defmt::{info, warn};
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};

use crate::system::resources::StorageResources;

/// Size of the flash in bytes
const FLASH_SIZE: usize = 2048 * 1024;

/// Offset of the calibration byte (start of the last sector)
const CALIBRATION_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Reads the stored calibration byte
///
/// A failed read is treated like erased flash.
pub fn load_calibration(r: StorageResources) -> Calibration {
    let mut flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(r.flash);
    let mut byte = [aethersense::calibration::ABSENT];
    if let Err(e) = flash.blocking_read(CALIBRATION_OFFSET, &mut byte) {
        warn!("Calibration read failed: {:?}", e);
        return Calibration::Absent;
    }

    let calibration = Calibration::from_stored(byte[0]);
    info!("Calibration: {:?}", calibration);
    calibration
}
