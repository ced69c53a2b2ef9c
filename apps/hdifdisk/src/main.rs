//! FAT12 inspector: recursive listing, FAT conformance checks, orphan
//! scan, and low-level FAT entry repair.

use std::path::PathBuf;
use std::process;

use hdifat::dir::Container;
use hdifat::entry::{
    RawEntry, ATTR_ARCHIVE, ATTR_DIRECTORY, ATTR_HIDDEN, ATTR_READ_ONLY, ATTR_SYSTEM,
    ATTR_VOLUME_ID,
};
use hdifat::volume::{Fat12Volume, EOC};
use hdifat::{image, FsError};

struct Switch {
    name: String,
    params: Vec<String>,
}

struct Args {
    switches: Vec<Switch>,
    filename: PathBuf,
}

impl Args {
    fn get(&self, name: &str) -> Option<&Switch> {
        self.switches.iter().find(|switch| switch.name == name)
    }
}

fn usage(prog: &str) {
    println!(
        "Use \"{prog} <hdifile>\" for a basic evaluation of the first FAT12 volume in the image"
    );
    println!("Use -l [list of clusters] to print FAT entries. With no clusters given, print all");
    println!("Use -m <list of clusters> to pick the FAT entries to modify. Combine with -s");
    println!("Use -s <value> (decimal) to pick the value the modified entries are set to");
}

/// Collect `-x param param ...` switches; the image path is the final
/// argument.
fn parse_args(argv: &[String]) -> Result<Args, i32> {
    if argv.is_empty() {
        println!("Shell error");
        return Err(-1);
    }
    if argv.len() < 2 {
        println!("No filename");
        usage(&argv[0]);
        return Err(-2);
    }
    let prog = &argv[0];
    let filename = PathBuf::from(&argv[argv.len() - 1]);
    let mut switches: Vec<Switch> = Vec::new();
    let mut current: Option<usize> = None;
    for arg in &argv[1..argv.len() - 1] {
        if arg.starts_with('-') {
            if let Some(index) = switches.iter().position(|switch| &switch.name == arg) {
                current = Some(index);
            } else {
                switches.push(Switch { name: arg.clone(), params: Vec::new() });
                current = Some(switches.len() - 1);
            }
        } else {
            let Some(index) = current else {
                println!("No option set");
                usage(prog);
                return Err(-3);
            };
            switches[index].params.push(arg.clone());
        }
    }
    Ok(Args { switches, filename })
}

fn hexdump(buffer: &[u8]) {
    for (row, chunk) in buffer.chunks(16).enumerate() {
        print!("{:08X}   ", row * 16);
        for i in 0..16 {
            match chunk.get(i) {
                Some(byte) => print!("{byte:02x} "),
                None => print!("   "),
            }
        }
        print!("  ");
        for &byte in chunk {
            if byte.is_ascii_graphic() || byte == b' ' {
                print!("{}", byte as char);
            } else {
                print!(".");
            }
        }
        println!();
    }
}

fn attr_flags(entry: &RawEntry) -> String {
    let mut flags = String::with_capacity(6);
    flags.push(if entry.attr & ATTR_READ_ONLY != 0 { 'R' } else { ' ' });
    flags.push(if entry.attr & ATTR_HIDDEN != 0 { 'H' } else { ' ' });
    flags.push(if entry.attr & ATTR_SYSTEM != 0 { 'S' } else { ' ' });
    flags.push(if entry.attr & ATTR_VOLUME_ID != 0 { 'V' } else { ' ' });
    flags.push(if entry.attr & ATTR_DIRECTORY != 0 { 'D' } else { ' ' });
    flags.push(if entry.attr & ATTR_ARCHIVE != 0 { 'A' } else { ' ' });
    flags
}

fn print_entry(entry: &RawEntry, depth: usize) {
    println!(
        "{:pad$}{} [{}] {:#X}, {}",
        "",
        entry.canonical_name(),
        attr_flags(entry),
        entry.size,
        entry.first_cluster,
        pad = depth * 4
    );
    if entry.first_cluster_high != 0 {
        println!("HIGH {} -- should be zero", entry.first_cluster_high);
    }
    if entry.first_cluster == 1 && !entry.is_dot_or_dotdot() {
        println!("Entry is invalid -- data cluster low is less than 2");
    }
    if entry.first_cluster == 0 && !entry.is_dot_or_dotdot() && entry.size != 0 {
        println!("Entry is invalid -- cluster is 0, but size is not");
    }
}

const MAX_PRINT_DEPTH: usize = 64;

fn print_directory(vol: &Fat12Volume, dir: &RawEntry, depth: usize) {
    if depth > MAX_PRINT_DEPTH {
        println!("directory nesting too deep, stopping here");
        return;
    }
    for (_, entry) in vol.dir_entries(Container::Chain(dir.first_cluster)) {
        print_entry(&entry, depth);
        if entry.is_directory() && !entry.is_dot_or_dotdot() {
            print_directory(vol, &entry, depth + 1);
        }
    }
}

fn print_tree(vol: &Fat12Volume) {
    for (_, entry) in vol.dir_entries(Container::Root) {
        print_entry(&entry, 0);
        if entry.is_directory() && !entry.is_dot_or_dotdot() {
            print_directory(vol, &entry, 1);
        }
    }
}

/// Whether `target` is a member of the chain starting at this entry.
fn chain_contains(vol: &Fat12Volume, entry: &RawEntry, target: u16) -> bool {
    let mut cluster = entry.first_cluster;
    if cluster == target {
        return true;
    }
    if !vol.data_cluster_in_range(cluster) {
        return false;
    }
    let mut hops = 0u32;
    while let Some(next) = vol.next_cluster(cluster) {
        if next == target {
            return true;
        }
        cluster = next;
        hops += 1;
        if hops > vol.max_cluster() as u32 {
            break;
        }
    }
    false
}

fn reachable_in_dir(vol: &Fat12Volume, dir: Container, target: u16, depth: usize) -> bool {
    if depth > MAX_PRINT_DEPTH {
        return false;
    }
    for (_, entry) in vol.dir_entries(dir) {
        if chain_contains(vol, &entry, target) {
            return true;
        }
        if entry.is_directory() && !entry.is_dot_or_dotdot() {
            if reachable_in_dir(vol, Container::Chain(entry.first_cluster), target, depth + 1) {
                return true;
            }
        }
    }
    false
}

/// Clusters marked used in the FAT but reachable from no directory entry.
fn orphan_scan(vol: &Fat12Volume) -> Vec<u16> {
    (2..vol.max_cluster())
        .filter(|&cluster| {
            vol.fat_get(cluster) != 0 && !reachable_in_dir(vol, Container::Root, cluster, 0)
        })
        .collect()
}

fn check_reserved_entries(vol: &Fat12Volume) {
    let expected = 0xF00 | vol.bpb().media_type as u16;
    if vol.fat_get(0) != expected {
        println!(
            "First entry in FAT is not {:#05X}, {:#05X} instead",
            expected,
            vol.fat_get(0)
        );
        println!("First 16 bytes (FAT 0)");
        hexdump(&vol.fat_slice()[..16]);
    }
    if vol.fat_get(1) != EOC {
        println!("Second entry in FAT is not 0xFFF, {:#05X} instead", vol.fat_get(1));
        println!("First 16 bytes (FAT 0)");
        hexdump(&vol.fat_slice()[..16]);
    }
}

fn modify_entries(vol: &mut Fat12Volume, args: &Args, path: &PathBuf) -> Result<(), i32> {
    let Some(marg) = args.get("-m") else {
        return Ok(());
    };
    let Some(sarg) = args.get("-s") else {
        println!("Option -s needs to be set if -m is present");
        return Err(-4);
    };
    if marg.params.is_empty() {
        println!("Option -m needs at least one cluster");
        return Err(-5);
    }
    if sarg.params.len() != 1 {
        println!("Option -s needs exactly 1 parameter");
        return Err(-6);
    }
    let value: u16 = match sarg.params[0].parse() {
        Ok(value) if value < vol.max_cluster() => value,
        _ => {
            println!("Cluster value to be set is out of range");
            return Err(-7);
        }
    };
    for param in &marg.params {
        let cluster: u16 = match param.parse() {
            Ok(cluster) if cluster < vol.max_cluster() => cluster,
            _ => {
                println!("Cluster index {param} to be set is out of range");
                return Err(-8);
            }
        };
        vol.fat_set(cluster, value);
    }

    println!("Sync FAT");
    vol.sync_fats();
    println!("Write shadow file {}", image::shadow_path(path).display());
    if image::persist(path, vol.buffer()).is_err() {
        println!("Could not write shadow file");
        return Err(-2);
    }
    println!("Written data to image");
    Ok(())
}

fn list_entries(vol: &Fat12Volume, args: &Args) {
    let Some(larg) = args.get("-l") else {
        return;
    };
    if larg.params.is_empty() {
        for cluster in 0..vol.max_cluster() {
            println!("FAT entry {}, value {}", cluster, vol.fat_get(cluster));
        }
        return;
    }
    for param in &larg.params {
        match param.parse::<u16>() {
            Ok(cluster) if cluster < vol.max_cluster() => {
                println!("FAT entry {}, value {}", cluster, vol.fat_get(cluster));
            }
            _ => println!("FAT entry {param} is out of range"),
        }
    }
}

fn main() {
    env_logger::init();
    process::exit(run());
}

fn run() -> i32 {
    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(code) => return code,
    };

    let buffer = match image::load(&args.filename) {
        Ok(buffer) => buffer,
        Err(_) => return -1,
    };
    println!("Process buffer {}", buffer.len());

    let mut vol = match Fat12Volume::parse(buffer) {
        Ok(vol) => vol,
        Err(FsError::Corrupt) => {
            println!("No valid volume found");
            return -1;
        }
        Err(err) => {
            println!("Cannot parse volume: {err}");
            return -1;
        }
    };

    if let Err(code) = modify_entries(&mut vol, &args, &args.filename) {
        return code;
    }

    print_tree(&vol);
    check_reserved_entries(&vol);

    let orphans = orphan_scan(&vol);
    if !orphans.is_empty() {
        println!("The following clusters may be orphans");
        let list: Vec<String> = orphans.iter().map(u16::to_string).collect();
        println!("{}", list.join(" "));
    }

    list_entries(&vol, &args);

    let free = vol.free_clusters();
    println!(
        "{} clusters free, equal to {} bytes",
        free,
        free * vol.cluster_size()
    );
    0
}
