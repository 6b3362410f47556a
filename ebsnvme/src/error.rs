use snafu::Snafu;

#[derive(Debug, Snafu)]
#[allow(missing_docs)]
#[snafu(visibility = "pub(crate)")]
pub enum NvmeError {
    #[snafu(display("Failed to open {}: {}", path, source))]
    DeviceOpen {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("NVMe identify controller failed on {}: {}", path, source))]
    IdentifyIoctl { path: String, source: nix::Error },
    #[snafu(display("{} does not exist", path))]
    NotFound { path: String },
    #[snafu(display("Failed to resolve {}: {}", path, source))]
    ResolvePath {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("{} is not a block device", path))]
    NotBlockDevice { path: String },
    #[snafu(display("{} is not an NVMe device", path))]
    NotNvme { path: String },
    #[snafu(display("{} is not an EBS volume or instance store device", path))]
    InvalidDevice { path: String },
    #[snafu(display("Failed to write output: {}", source))]
    Output { source: std::io::Error },
}

impl NvmeError {
    /// true when the identify command itself could not be issued or failed,
    /// as opposed to the device being rejected by validation
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NvmeError::DeviceOpen { .. } | NvmeError::IdentifyIoctl { .. }
        )
    }
}
