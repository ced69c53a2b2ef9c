//! HDI header inspector and stripper.

use std::fs;
use std::path::PathBuf;
use std::process;

use hdifat::hdi::HdiHeader;
use hdifat::image;

fn main() {
    env_logger::init();
    process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "usage: {} <hdi> [out]",
            args.first().map(String::as_str).unwrap_or("hdimanip")
        );
        return -1;
    }
    let path = PathBuf::from(&args[1]);
    let buffer = match image::load(&path) {
        Ok(buffer) => buffer,
        Err(err) => {
            eprintln!("cannot read {}: {err}", path.display());
            return -1;
        }
    };
    println!("Process buffer {}", buffer.len());

    let header = match HdiHeader::parse(&buffer) {
        Ok(header) => header,
        Err(_) => {
            println!("Is not a supported format. First 4 bytes must be 0");
            return -2;
        }
    };
    println!("Identifier {}", header.kind);
    println!("headerSize {}", header.header_size);
    println!("dataSize {}", header.data_size);
    println!("bytesPerSector {}", header.bytes_per_sector);
    println!("sectors {}", header.sectors);
    println!("heads {}", header.heads);
    println!("cylinders {}", header.cylinders);

    if let Some(out) = args.get(2) {
        println!("Write image without headers to {out}");
        if let Err(err) = fs::write(out, header.payload(&buffer)) {
            eprintln!("cannot write {out}: {err}");
            return -2;
        }
    }
    0
}
