#[macro_use]
extern crate clap;
use clap::{App, Arg, ArgGroup, ArgMatches};
use env_logger::Env;

use std::io;

use ebsnvme::{
    dev_path::resolve_device,
    device::Device,
    report::{report, OutputMode},
    NvmeError,
};

fn main() {
    // stdout is consumed by udev, keep diagnostics on stderr and quiet
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .init();

    let matches = App::new("ebsnvme-id")
        .version(crate_version!())
        .about("Reads EBS information from EC2 NVMe block devices")
        .arg(
            Arg::with_name("device")
                .help("Device to query, e.g. nvme1n1 or /dev/nvme1n1")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("volume")
                .short("v")
                .long("volume")
                .help("Print the EBS volume id"),
        )
        .arg(
            Arg::with_name("block-dev-aliases")
                .short("b")
                .long("block-dev-aliases")
                .help("Print the block device aliases of the device"),
        )
        .arg(
            Arg::with_name("udev")
                .short("u")
                .long("udev")
                .help("Print KEY=value pairs suitable for udev IMPORT"),
        )
        .group(ArgGroup::with_name("display").args(&[
            "volume",
            "block-dev-aliases",
            "udev",
        ]))
        .get_matches();

    if let Err(e) = perform_action(&matches) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn perform_action(matches: &ArgMatches) -> Result<(), NvmeError> {
    let path = resolve_device(matches.value_of("device").unwrap())?;
    let dev = Device::new(&path);

    let mode = if matches.is_present("udev") {
        OutputMode::Udev
    } else if matches.is_present("volume") {
        OutputMode::Volume
    } else if matches.is_present("block-dev-aliases") {
        OutputMode::BlockDevAliases
    } else {
        OutputMode::All
    };

    let stdout = io::stdout();
    report(&dev, mode, &mut stdout.lock())
}
