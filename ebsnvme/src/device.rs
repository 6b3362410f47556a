use once_cell::unsync::OnceCell;
use std::path::{Path, PathBuf};

use crate::{
    alias::{
        block_device_basename,
        instance_store_alias,
        normalize_volume_id,
        DeviceKind,
        UdevAliases,
    },
    error::NvmeError,
    identify::{IdentifyController, NvmeIoctl},
    nvme_identify::ControllerIdentify,
    DEV_DIR,
};

/// An NVMe block device on an EC2 instance. Nothing is read from the device
/// until the first accessor is called; the identify controller command is
/// then issued exactly once and every derived value is cached for the
/// lifetime of the instance.
///
/// Accessors that only apply to one kind of device return `Ok(None)` for the
/// others. An `Err` always means the identify command itself failed.
#[derive(Debug)]
pub struct Device<T = NvmeIoctl> {
    /// device path, e.g. /dev/nvme1n1
    path: PathBuf,
    transport: T,
    id_ctrl: OnceCell<Box<ControllerIdentify>>,
    model: OnceCell<String>,
    vendor_id: OnceCell<u16>,
    serial: OnceCell<String>,
    kind: OnceCell<DeviceKind>,
    volume_id: OnceCell<Option<String>>,
    ebs_block_device: OnceCell<Option<String>>,
    instance_store_alias: OnceCell<Option<Vec<String>>>,
    udev_aliases: OnceCell<Option<UdevAliases>>,
    block_device_aliases: OnceCell<Option<Vec<String>>>,
}

impl Device<NvmeIoctl> {
    /// Device that is identified through the kernels nvme driver.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_transport(path, NvmeIoctl)
    }
}

impl<T: IdentifyController> Device<T> {
    pub fn with_transport<P: AsRef<Path>>(path: P, transport: T) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            transport,
            id_ctrl: OnceCell::new(),
            model: OnceCell::new(),
            vendor_id: OnceCell::new(),
            serial: OnceCell::new(),
            kind: OnceCell::new(),
            volume_id: OnceCell::new(),
            ebs_block_device: OnceCell::new(),
            instance_store_alias: OnceCell::new(),
            udev_aliases: OnceCell::new(),
            block_device_aliases: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// the kernel name of the device, e.g. nvme1n1
    pub fn kernel_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    fn id_ctrl(&self) -> Result<&ControllerIdentify, NvmeError> {
        self.id_ctrl
            .get_or_try_init(|| {
                self.transport.identify_controller(&self.path)
            })
            .map(|id| id.as_ref())
    }

    /// model number with its padding removed
    pub fn model(&self) -> Result<&str, NvmeError> {
        self.model
            .get_or_try_init(|| self.id_ctrl().map(|id| id.model_number()))
            .map(String::as_str)
    }

    pub fn vendor_id(&self) -> Result<u16, NvmeError> {
        self.vendor_id
            .get_or_try_init(|| self.id_ctrl().map(|id| id.vendor_id()))
            .map(|vid| *vid)
    }

    /// serial number with its padding removed
    pub fn serial_number(&self) -> Result<&str, NvmeError> {
        self.serial
            .get_or_try_init(|| self.id_ctrl().map(|id| id.serial_number()))
            .map(String::as_str)
    }

    pub fn kind(&self) -> Result<DeviceKind, NvmeError> {
        self.kind
            .get_or_try_init(|| -> Result<_, NvmeError> {
                let kind =
                    DeviceKind::classify(self.vendor_id()?, self.model()?);
                debug!("{} classified as {}", self.path.display(), kind);
                Ok(kind)
            })
            .map(|kind| *kind)
    }

    /// EBS volume id in its canonical `vol-xxxxxxxx` form
    pub fn volume_id(&self) -> Result<Option<&str>, NvmeError> {
        self.volume_id
            .get_or_try_init(|| -> Result<_, NvmeError> {
                Ok(match self.kind()? {
                    DeviceKind::Ebs => {
                        Some(normalize_volume_id(self.serial_number()?))
                    }
                    _ => None,
                })
            })
            .map(|vol| vol.as_deref())
    }

    /// The block device name the EBS volume was attached as, without any
    /// leading path.
    pub fn ebs_block_device(&self) -> Result<Option<&str>, NvmeError> {
        self.ebs_block_device
            .get_or_try_init(|| -> Result<_, NvmeError> {
                Ok(match self.kind()? {
                    DeviceKind::Ebs => {
                        let bdev =
                            self.id_ctrl()?.vendor_specific().block_device();
                        Some(block_device_basename(&bdev).to_string())
                    }
                    _ => None,
                })
            })
            .map(|bdev| bdev.as_deref())
    }

    pub fn instance_store_alias(
        &self,
    ) -> Result<Option<&[String]>, NvmeError> {
        self.instance_store_alias
            .get_or_try_init(|| -> Result<_, NvmeError> {
                Ok(match self.kind()? {
                    DeviceKind::InstanceStore => {
                        self.kernel_name().and_then(instance_store_alias)
                    }
                    _ => None,
                })
            })
            .map(|alias| alias.as_deref())
    }

    /// The names relative to `/dev` udev should link to this device. None
    /// for invalid devices and for EBS volumes whose embedded name is not
    /// recognised.
    pub fn udev_aliases(&self) -> Result<Option<&UdevAliases>, NvmeError> {
        self.udev_aliases
            .get_or_try_init(|| -> Result<_, NvmeError> {
                Ok(match self.kind()? {
                    DeviceKind::InstanceStore => {
                        self.instance_store_alias()?.map(|names| {
                            UdevAliases::InstanceStore(names.to_vec())
                        })
                    }
                    DeviceKind::Ebs => match self.ebs_block_device()? {
                        Some(bdev) => {
                            let aliases = UdevAliases::ebs(bdev);
                            if aliases.is_none() {
                                warn!(
                                    "{}: unrecognised block device name {:?}",
                                    self.path.display(),
                                    bdev
                                );
                            }
                            aliases
                        }
                        None => None,
                    },
                    DeviceKind::Invalid => None,
                })
            })
            .map(Option::as_ref)
    }

    /// [`Self::udev_aliases`] as absolute paths below `/dev`
    pub fn block_device_aliases(
        &self,
    ) -> Result<Option<&[String]>, NvmeError> {
        self.block_device_aliases
            .get_or_try_init(|| -> Result<_, NvmeError> {
                Ok(self.udev_aliases()?.map(|aliases| {
                    aliases
                        .names()
                        .iter()
                        .map(|name| format!("{}/{}", DEV_DIR, name))
                        .collect()
                }))
            })
            .map(|aliases| aliases.as_deref())
    }
}
