//! Mount a FAT12 HDI image as a read/write directory tree.
//!
//! The image is loaded read-only into memory; all mutations stay in the
//! buffer until the session loop exits cleanly, then the buffer is
//! written to a shadow file and renamed over the original.

mod adapter;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use hdifat::{image, Fat12Volume, Session};
use log::{error, info};

fn usage(prog: &str) {
    eprintln!("usage: {prog} [options] <image> <mountpoint>");
}

fn main() {
    env_logger::init();
    let code = run();
    process::exit(code);
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        usage(args.first().map(String::as_str).unwrap_or("hdifuse"));
        return -1;
    }
    let mountpoint = PathBuf::from(&args[args.len() - 1]);
    let image_path = PathBuf::from(&args[args.len() - 2]);
    let options = adapter::mount_options(&args[1..args.len() - 2]);

    let buffer = match image::load(&image_path) {
        Ok(buffer) => buffer,
        Err(err) => {
            error!("cannot open {}: {err}", image_path.display());
            return -1;
        }
    };
    let volume = match Fat12Volume::parse(buffer) {
        Ok(volume) => volume,
        Err(err) => {
            error!("{} holds no mountable FAT12 volume: {err}", image_path.display());
            return -1;
        }
    };
    info!("mount {} on {}", image_path.display(), mountpoint.display());

    let fs = adapter::HdiFuse::new(Session::new(volume));
    let shared = fs.session();
    if let Err(err) = fuser::mount2(fs, &mountpoint, &options) {
        error!("mount failed: {err}");
        return -1;
    }

    // The session loop has exited; nothing else references the session.
    let session = match Arc::try_unwrap(shared) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(|poison| poison.into_inner()),
        Err(_) => {
            error!("session is still referenced after unmount");
            return -2;
        }
    };
    let mut volume = session.into_volume();
    volume.sync_fats();
    if image::persist(&image_path, volume.buffer()).is_err() {
        error!("could not write the image back");
        return -2;
    }
    0
}
