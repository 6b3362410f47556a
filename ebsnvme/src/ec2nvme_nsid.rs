#[macro_use]
extern crate clap;
use clap::{App, Arg};
use env_logger::Env;

use ebsnvme::alias::namespace_id;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .init();

    let matches = App::new("ec2nvme-nsid")
        .version(crate_version!())
        .about("Prints the namespace id of an NVMe kernel device name")
        .arg(
            Arg::with_name("kernel")
                .help("Kernel device name, e.g. nvme0n1 or nvme0n1p2")
                .required(true)
                .index(1),
        )
        .get_matches();

    let kernel = matches.value_of("kernel").unwrap();
    match namespace_id(kernel) {
        Some(nsid) => println!("{}", nsid),
        None => {
            eprintln!("{}: no namespace id in device name", kernel);
            std::process::exit(1);
        }
    }
}
