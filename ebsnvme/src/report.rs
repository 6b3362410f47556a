//! What `ebsnvme-id` prints for a device.
use snafu::ResultExt;
use std::io::Write;

use crate::{
    device::Device,
    error::{NvmeError, Output},
    identify::IdentifyController,
    DeviceKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `Volume ID: <id>` followed by one alias per line
    All,
    /// the bare volume id
    Volume,
    /// one `/dev/` alias per line
    BlockDevAliases,
    /// `KEY=value` lines for udev's `IMPORT{program}`
    Udev,
}

/// Write the requested information about `dev` to `out`. Devices that are
/// neither EBS nor instance store fail with [`NvmeError::InvalidDevice`]
/// before anything is written.
pub fn report<W: Write, T: IdentifyController>(
    dev: &Device<T>,
    mode: OutputMode,
    out: &mut W,
) -> Result<(), NvmeError> {
    if dev.kind()? == DeviceKind::Invalid {
        return Err(NvmeError::InvalidDevice {
            path: dev.path().display().to_string(),
        });
    }

    let mut lines = Vec::new();
    match mode {
        OutputMode::Udev => {
            if let Some(aliases) = dev.udev_aliases()? {
                lines.extend(aliases.udev_env());
            }
        }
        OutputMode::Volume => {
            lines.extend(dev.volume_id()?.map(String::from));
        }
        OutputMode::BlockDevAliases => {
            lines.extend(
                dev.block_device_aliases()?.unwrap_or_default().iter().cloned(),
            );
        }
        OutputMode::All => {
            if let Some(vol) = dev.volume_id()? {
                lines.push(format!("Volume ID: {}", vol));
            }
            lines.extend(
                dev.block_device_aliases()?.unwrap_or_default().iter().cloned(),
            );
        }
    }

    for line in lines {
        writeln!(out, "{}", line).context(Output {})?;
    }
    Ok(())
}
