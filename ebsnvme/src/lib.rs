//!
//! ebsnvme identifies the NVMe devices of an Amazon EC2 instance and derives
//! the block device aliases (`/dev/sdX`, `/dev/xvdX`, `ec2_ephemeral_nvmeX`)
//! they were requested under.
//!
//! The kernel enumerates NVMe namespaces in probe order, so `nvme1n1` today
//! may be `nvme2n1` after a reboot. EBS volumes carry the originally requested
//! device name in the vendor specific region of the identify controller data,
//! and the model number tells EBS volumes and instance storage apart.
//!
//! # Looking up a device
//! ```no_run
//! use ebsnvme::{device::Device, DeviceKind};
//!
//! let dev = Device::new("/dev/nvme1n1");
//! if dev.kind().unwrap() == DeviceKind::Ebs {
//!     println!("{:?}", dev.volume_id().unwrap());
//!     println!("{:?}", dev.block_device_aliases().unwrap());
//! }
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate nix;
#[macro_use]
extern crate ioctl_gen;

use crate::nvme_identify::NvmeAdminCmd;

pub mod alias;
pub mod dev_path;
pub mod device;
pub mod error;
pub mod identify;
pub mod nvme_identify;
pub mod report;

pub use alias::{DeviceKind, UdevAliases};
pub use error::NvmeError;

/// PCI vendor id Amazon uses for all of its NVMe controllers
pub const AMZN_NVME_VID: u16 = 0x1D0F;
/// model number reported by EBS volumes
pub const AMZN_NVME_EBS_MN: &str = "Amazon Elastic Block Store";
/// model number reported by local instance storage
pub const AMZN_NVME_INS_MN: &str = "Amazon EC2 NVMe Instance Storage";

/// directory the kernel creates block device nodes and udev creates the
/// alias symlinks in
pub const DEV_DIR: &str = "/dev";

/// admin opcode for the identify command
pub const NVME_ADMIN_IDENTIFY: u8 = 0x06;
/// CNS value (cdw10) selecting the identify controller data structure
pub const NVME_IDENTIFY_CNS_CTRL: u32 = 1;

/// ioctl for passing an admin command to the kernels nvme driver
pub const NVME_ADMIN_CMD_IOCTL: u32 =
    iowr!(b'N', 0x41, std::mem::size_of::<NvmeAdminCmd>());
