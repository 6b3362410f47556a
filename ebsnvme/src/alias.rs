//! Classification of Amazon NVMe controllers and the rules for turning the
//! identify data into the names udev should link to the device.
use std::fmt;

use crate::{AMZN_NVME_EBS_MN, AMZN_NVME_INS_MN, AMZN_NVME_VID};

/// prefix of the synthetic instance store alias
pub const INSTANCE_STORE_PREFIX: &str = "ec2_ephemeral_nvme";
/// prefix every NVMe kernel device name starts with
const NVME_PREFIX: &str = "nvme";

/// What kind of Amazon NVMe device we are looking at, decided once from the
/// vendor id and model number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    InstanceStore,
    Ebs,
    /// anything that is not an Amazon EBS or instance store controller
    Invalid,
}

impl DeviceKind {
    /// The vendor id is shared by every Amazon NVMe product, so the model
    /// number has to match exactly as well.
    pub fn classify(vendor_id: u16, model: &str) -> Self {
        if vendor_id != AMZN_NVME_VID {
            return DeviceKind::Invalid;
        }
        match model {
            AMZN_NVME_EBS_MN => DeviceKind::Ebs,
            AMZN_NVME_INS_MN => DeviceKind::InstanceStore,
            _ => DeviceKind::Invalid,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self {
            DeviceKind::InstanceStore => "instance-store",
            DeviceKind::Ebs => "ebs",
            DeviceKind::Invalid => "invalid",
        };
        write!(f, "{}", kind)
    }
}

/// The names (relative to `/dev`) a device should be reachable under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UdevAliases {
    /// single synthetic `ec2_ephemeral_nvmeX` name
    InstanceStore(Vec<String>),
    /// EBS volumes answer to both the `sd` and the `xvd` spelling of the
    /// requested name
    Ebs { sd: String, xvd: String },
}

impl UdevAliases {
    /// Derive the alias pair from the name embedded in the vendor specific
    /// region. Returns None for names that are neither `xvd*` nor `sd*`.
    pub fn ebs(name: &str) -> Option<Self> {
        if name.starts_with("xvd") {
            Some(UdevAliases::Ebs {
                sd: name.replacen("xvd", "sd", 1),
                xvd: name.to_string(),
            })
        } else if name.starts_with("sd") {
            Some(UdevAliases::Ebs {
                sd: name.to_string(),
                xvd: name.replacen("sd", "xvd", 1),
            })
        } else {
            None
        }
    }

    /// the aliases in output order, `sd` before `xvd`
    pub fn names(&self) -> Vec<&str> {
        match self {
            UdevAliases::InstanceStore(names) => {
                names.iter().map(String::as_str).collect()
            }
            UdevAliases::Ebs { sd, xvd } => vec![sd.as_str(), xvd.as_str()],
        }
    }

    /// `KEY=value` lines for udev's `IMPORT{program}`
    pub fn udev_env(&self) -> Vec<String> {
        match self {
            UdevAliases::InstanceStore(names) => names
                .iter()
                .map(|n| format!("_ISTORE_ALIAS={}", n))
                .collect(),
            UdevAliases::Ebs { sd, xvd } => vec![
                format!("_EBS_ALIAS_SD={}", sd),
                format!("_EBS_ALIAS_XVD={}", xvd),
            ],
        }
    }
}

/// Serial numbers of EBS controllers are the volume id without its hyphen,
/// `vol0123...` becomes `vol-0123...`. Anything else is returned as is.
pub fn normalize_volume_id(serial: &str) -> String {
    match serial.strip_prefix("vol") {
        Some(rest) if !rest.is_empty() && !rest.starts_with('-') => {
            format!("vol-{}", rest)
        }
        _ => serial.to_string(),
    }
}

/// Strip any leading path from the embedded block device name, so both
/// `/dev/sdf` and `sdf` yield `sdf`.
pub fn block_device_basename(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// The instance store alias uses the character right after the `nvme` prefix
/// of the kernel name as index, so controllers numbered 10 and up collide
/// with their single digit counterparts.
pub fn instance_store_alias(kernel_name: &str) -> Option<Vec<String>> {
    if !kernel_name.starts_with(NVME_PREFIX) {
        return None;
    }
    kernel_name[NVME_PREFIX.len() ..]
        .chars()
        .next()
        .map(|index| vec![format!("{}{}", INSTANCE_STORE_PREFIX, index)])
}

/// Namespace id of a kernel device name, as used in the `-ns-<id>` suffix of
/// by-id links: the third `n` separated field up to the partition marker,
/// `nvme0n1p2` yields `1`.
pub fn namespace_id(kernel_name: &str) -> Option<&str> {
    kernel_name
        .split('n')
        .nth(2)
        .and_then(|field| field.split('p').next())
        .filter(|nsid| !nsid.is_empty())
}
