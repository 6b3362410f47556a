//! Turn the device argument given on the command line into the path of an
//! NVMe namespace block device.
use once_cell::sync::Lazy;
use regex::Regex;
use snafu::ResultExt;
use std::{
    fs,
    os::unix::fs::FileTypeExt,
    path::{Path, PathBuf},
};

use crate::{
    error::{NotBlockDevice, NotFound, NotNvme, NvmeError, ResolvePath},
    DEV_DIR,
};

static NVME_NAMESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^nvme[0-9]+n[0-9]+$").unwrap());

/// true for kernel names of NVMe namespaces, `nvme0n1` but not `nvme0` or
/// `nvme0n1p1`
pub fn is_nvme_namespace(name: &str) -> bool {
    NVME_NAMESPACE.is_match(name)
}

/// Names that are not absolute are looked up in `/dev`. Symlinks are
/// resolved before the target is checked, so udev aliases such as
/// `/dev/xvdf` are accepted as well.
pub fn resolve_device(device: &str) -> Result<PathBuf, NvmeError> {
    let path = if Path::new(device).is_absolute() {
        PathBuf::from(device)
    } else {
        Path::new(DEV_DIR).join(device)
    };

    if !path.exists() {
        return NotFound {
            path: path.display().to_string(),
        }
        .fail();
    }

    let resolved = fs::canonicalize(&path).context(ResolvePath {
        path: path.display().to_string(),
    })?;

    let meta = fs::metadata(&resolved).context(ResolvePath {
        path: resolved.display().to_string(),
    })?;
    if !meta.file_type().is_block_device() {
        return NotBlockDevice {
            path: resolved.display().to_string(),
        }
        .fail();
    }

    let nvme = resolved
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, is_nvme_namespace);
    if !nvme {
        return NotNvme {
            path: resolved.display().to_string(),
        }
        .fail();
    }

    debug!("{} resolved to {}", device, resolved.display());
    Ok(resolved)
}
