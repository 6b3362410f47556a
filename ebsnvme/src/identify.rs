//! Issue the NVMe admin identify controller command against a block device.
use std::{fs::OpenOptions, os::unix::io::AsRawFd, path::Path};

use nix::libc::ioctl as nix_ioctl;
use snafu::ResultExt;

use crate::{
    error::{DeviceOpen, IdentifyIoctl, NvmeError},
    nvme_identify::{ControllerIdentify, NvmeAdminCmd},
    NVME_ADMIN_CMD_IOCTL,
};

/// Source of identify controller data for a device. [`NvmeIoctl`] asks the
/// kernel; tests substitute canned pages.
pub trait IdentifyController {
    fn identify_controller(
        &self,
        device: &Path,
    ) -> Result<Box<ControllerIdentify>, NvmeError>;
}

/// Identify through `NVME_IOCTL_ADMIN_CMD` on the device node itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct NvmeIoctl;

impl IdentifyController for NvmeIoctl {
    fn identify_controller(
        &self,
        device: &Path,
    ) -> Result<Box<ControllerIdentify>, NvmeError> {
        // the driver rejects admin passthrough on read only handles, even
        // though nothing gets written to the media
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .open(device)
            .context(DeviceOpen {
                path: device.display().to_string(),
            })?;

        let mut id = Box::new(ControllerIdentify::default());
        let mut cmd = NvmeAdminCmd::identify_controller(&mut id);

        debug!(
            "identify controller on {} (opcode {:#04x}, cdw10 {})",
            device.display(),
            cmd.opcode,
            cmd.cdw10
        );

        let _ret = unsafe {
            convert_ioctl_res!(nix_ioctl(
                f.as_raw_fd(),
                NVME_ADMIN_CMD_IOCTL as _,
                &mut cmd as *mut NvmeAdminCmd
            ))
        }
        .context(IdentifyIoctl {
            path: device.display().to_string(),
        })?;

        trace!("{}: {:?}", device.display(), id);
        Ok(id)
    }
}
