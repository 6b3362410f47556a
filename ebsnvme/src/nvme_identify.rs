//! Binary layouts shared with the kernels nvme driver: the admin command
//! passed through `NVME_IOCTL_ADMIN_CMD` and the 4096 byte identify controller
//! data structure it fills in. See NVM-Express 1.3d 5.15.2.
//!
//! Every field sits on its natural alignment, so `repr(C)` introduces no
//! padding; the size assertions at the bottom of this file keep it that way.
use libc::c_uchar;
use std::{fmt, mem::size_of};

use crate::{NVME_ADMIN_IDENTIFY, NVME_IDENTIFY_CNS_CTRL};

#[repr(C)]
#[derive(Default, Clone, Copy, Debug)]
pub struct NvmeAdminCmd {
    pub opcode: c_uchar,
    pub flags: c_uchar,
    pub rsvd1: u16,
    pub nsid: u32,
    pub cdw2: u32,
    pub cdw3: u32,
    pub metadata: u64,
    pub addr: u64,
    pub metadata_len: u32,
    pub data_len: u32,
    pub cdw10: u32,
    pub cdw11: u32,
    pub cdw12: u32,
    pub cdw13: u32,
    pub cdw14: u32,
    pub cdw15: u32,
    pub timeout_ms: u32,
    pub result: u32,
}

impl NvmeAdminCmd {
    /// Build an identify controller command that lets the kernel write the
    /// response into `buf`. The buffer must outlive the ioctl.
    pub fn identify_controller(buf: &mut ControllerIdentify) -> Self {
        Self {
            opcode: NVME_ADMIN_IDENTIFY,
            addr: buf as *mut ControllerIdentify as u64,
            data_len: size_of::<ControllerIdentify>() as u32,
            cdw10: NVME_IDENTIFY_CNS_CTRL,
            ..Default::default()
        }
    }
}

/// Power state descriptor, 32 of these precede the vendor specific region.
#[repr(C)]
#[derive(Default, Clone, Copy, Debug)]
pub struct PowerStateDescriptor {
    /// maximum power
    pub mp: u16,
    pub rsvd2: u16,
    /// entry latency
    pub enlat: u32,
    /// exit latency
    pub exlat: u32,
    /// relative read throughput
    pub rrt: u8,
    /// relative read latency
    pub rrl: u8,
    /// relative write throughput
    pub rwt: u8,
    /// relative write latency
    pub rwl: u8,
    pub rsvd16: [c_uchar; 16usize],
}

/// The 1024 byte vendor specific tail of the identify controller data. Amazon
/// stores the block device name the volume was attached as in the first 32
/// bytes, space padded.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AmznVendorSpecific {
    pub bdev: [c_uchar; 32usize],
    pub rsvd32: [c_uchar; 992usize],
}

impl Default for AmznVendorSpecific {
    fn default() -> Self {
        Self {
            bdev: [0; 32],
            rsvd32: [0; 992],
        }
    }
}

impl fmt::Debug for AmznVendorSpecific {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AmznVendorSpecific")
            .field("bdev", &self.block_device())
            .finish()
    }
}

impl AmznVendorSpecific {
    /// the embedded block device name, e.g. `xvdb` or `/dev/sdf`
    pub fn block_device(&self) -> String {
        ascii_field(&self.bdev)
    }
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct ControllerIdentify {
    /// PCI vendor id
    pub vid: u16,
    /// PCI subsystem vendor id
    pub ssvid: u16,
    /// serial number
    pub sn: [c_uchar; 20usize],
    /// model number
    pub mn: [c_uchar; 40usize],
    /// firmware revision
    pub fr: [c_uchar; 8usize],
    /// recommended arbitration burst
    pub rab: u8,
    pub ieee: [c_uchar; 3usize],
    /// multi-interface capabilities
    pub mic: u8,
    /// maximum data transfer size
    pub mdts: u8,
    pub rsvd78: [c_uchar; 178usize],
    /// optional admin command support
    pub oacs: u16,
    /// abort command limit
    pub acl: u8,
    /// asynchronous event request limit
    pub aerl: u8,
    pub frmw: u8,
    /// log page attributes
    pub lpa: u8,
    /// error log page entries
    pub elpe: u8,
    /// number of power states supported
    pub npss: u8,
    pub avscc: u8,
    pub rsvd265: [c_uchar; 247usize],
    /// submission queue entry size
    pub sqes: u8,
    /// completion queue entry size
    pub cqes: u8,
    pub rsvd514: u16,
    /// number of namespaces
    pub nn: u32,
    /// optional NVM command support
    pub oncs: u16,
    pub fuses: u16,
    pub fna: u8,
    /// volatile write cache
    pub vwc: u8,
    pub awun: u16,
    pub awupf: u16,
    pub nvscc: u8,
    pub rsvd531: [c_uchar; 173usize],
    pub rsvd704: [c_uchar; 1344usize],
    pub psd: [PowerStateDescriptor; 32usize],
    pub vs: AmznVendorSpecific,
}

impl Default for ControllerIdentify {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerIdentify {
    fn new() -> Self {
        Self {
            ..unsafe { std::mem::zeroed() }
        }
    }

    pub fn vendor_id(&self) -> u16 {
        u16::from_le(self.vid)
    }

    pub fn subsystem_vendor_id(&self) -> u16 {
        u16::from_le(self.ssvid)
    }

    pub fn serial_number(&self) -> String {
        ascii_field(&self.sn)
    }

    pub fn model_number(&self) -> String {
        ascii_field(&self.mn)
    }

    pub fn firmware_revision(&self) -> String {
        ascii_field(&self.fr)
    }

    pub fn vendor_specific(&self) -> &AmznVendorSpecific {
        &self.vs
    }
}

impl fmt::Debug for ControllerIdentify {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ControllerIdentify")
            .field("vid", &format_args!("{:#06x}", self.vendor_id()))
            .field(
                "ssvid",
                &format_args!("{:#06x}", self.subsystem_vendor_id()),
            )
            .field("sn", &self.serial_number())
            .field("mn", &self.model_number())
            .field("fr", &self.firmware_revision())
            .field("vs", &self.vs)
            .finish()
    }
}

/// Identify strings are fixed width and space padded. They are not null
/// terminated, but a zeroed buffer must still decode to an empty string.
fn ascii_field(raw: &[u8]) -> String {
    let raw = raw.split(|b| *b == 0).next().unwrap_or_default();
    String::from_utf8_lossy(raw).trim().to_string()
}

const _: () = assert!(size_of::<NvmeAdminCmd>() == 72);
const _: () = assert!(size_of::<PowerStateDescriptor>() == 32);
const _: () = assert!(size_of::<AmznVendorSpecific>() == 1024);
const _: () = assert!(size_of::<ControllerIdentify>() == 4096);

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::addr_of;

    macro_rules! offset {
        ($base:expr, $field:ident) => {
            addr_of!($base.$field) as usize - addr_of!($base) as usize
        };
    }

    #[test]
    fn admin_cmd_layout() {
        let cmd = NvmeAdminCmd::default();
        assert_eq!(offset!(cmd, nsid), 4);
        assert_eq!(offset!(cmd, metadata), 16);
        assert_eq!(offset!(cmd, addr), 24);
        assert_eq!(offset!(cmd, data_len), 36);
        assert_eq!(offset!(cmd, cdw10), 40);
        assert_eq!(offset!(cmd, timeout_ms), 64);
        assert_eq!(offset!(cmd, result), 68);
    }

    #[test]
    fn controller_identify_layout() {
        let id = ControllerIdentify::default();
        assert_eq!(offset!(id, ssvid), 2);
        assert_eq!(offset!(id, sn), 4);
        assert_eq!(offset!(id, mn), 24);
        assert_eq!(offset!(id, fr), 64);
        assert_eq!(offset!(id, mdts), 77);
        assert_eq!(offset!(id, oacs), 256);
        assert_eq!(offset!(id, avscc), 264);
        assert_eq!(offset!(id, sqes), 512);
        assert_eq!(offset!(id, nn), 516);
        assert_eq!(offset!(id, nvscc), 530);
        assert_eq!(offset!(id, rsvd704), 704);
        assert_eq!(offset!(id, psd), 2048);
        assert_eq!(offset!(id, vs), 3072);
    }

    #[test]
    fn identify_controller_cmd() {
        let mut id = ControllerIdentify::default();
        let cmd = NvmeAdminCmd::identify_controller(&mut id);
        assert_eq!(cmd.opcode, 0x06);
        assert_eq!(cmd.cdw10, 1);
        assert_eq!(cmd.data_len, 4096);
        assert_eq!(cmd.addr, &id as *const _ as u64);
        assert_eq!(cmd.nsid, 0);
        assert_eq!(cmd.cdw11, 0);
        assert_eq!(cmd.metadata, 0);
    }

    #[test]
    fn ascii_fields_are_trimmed() {
        assert_eq!(ascii_field(b"vol0123456789abcdef "), "vol0123456789abcdef");
        assert_eq!(ascii_field(b"sdf\0\0\0\0\0"), "sdf");
        assert_eq!(ascii_field(&[0u8; 8]), "");
        assert_eq!(ascii_field(b"        "), "");
    }

    #[test]
    fn decode_from_raw_page() {
        let mut page = [0u8; 4096];
        page[0 .. 2].copy_from_slice(&0x1d0fu16.to_le_bytes());
        page[2 .. 4].copy_from_slice(&0x1d0fu16.to_le_bytes());
        let sn = format!("{:<20}", "vol0abc123def456789");
        page[4 .. 24].copy_from_slice(sn.as_bytes());
        let mn = format!("{:<40}", "Amazon Elastic Block Store");
        page[24 .. 64].copy_from_slice(mn.as_bytes());
        page[64 .. 72].copy_from_slice(b"1.0     ");
        let bdev = format!("{:<32}", "xvdf");
        page[3072 .. 3104].copy_from_slice(bdev.as_bytes());

        let id: ControllerIdentify =
            unsafe { std::ptr::read_unaligned(page.as_ptr() as *const _) };

        assert_eq!(id.vendor_id(), 0x1d0f);
        assert_eq!(id.subsystem_vendor_id(), 0x1d0f);
        assert_eq!(id.serial_number(), "vol0abc123def456789");
        assert_eq!(id.model_number(), "Amazon Elastic Block Store");
        assert_eq!(id.firmware_revision(), "1.0");
        assert_eq!(id.vendor_specific().block_device(), "xvdf");
    }
}
