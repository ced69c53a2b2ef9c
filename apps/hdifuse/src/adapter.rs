//! Adapter between the [`MountOps`] contract and the fuser transport.
//!
//! Each callback takes the session lock for its whole duration, so the
//! engine runs as cooperative serialized execution no matter how many
//! kernel threads are in flight.

use std::ffi::OsStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fatvfs::{FileKind, FsError, MountOps, OpenFlags, Stat};
use fuser::{
    FileAttr, FileType, Filesystem, MountOption, ReplyAttr, ReplyCreate, ReplyData,
    ReplyDirectory, ReplyEmpty, ReplyEntry, ReplyOpen, ReplyWrite, Request,
};
use hdifat::Session;
use log::warn;

const TTL: Duration = Duration::from_secs(1);

pub struct HdiFuse {
    session: Arc<Mutex<Session>>,
}

impl HdiFuse {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// A second reference to the session, for reclaiming the volume
    /// after the mount loop returns.
    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }

    fn locked(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

fn errno(err: FsError) -> i32 {
    match err {
        FsError::NoEntry => libc::ENOENT,
        FsError::NotDir => libc::ENOTDIR,
        FsError::IsDir => libc::EISDIR,
        FsError::Access => libc::EACCES,
        FsError::Busy => libc::EBUSY,
        FsError::Space => libc::ENOSPC,
        FsError::NoMem => libc::ENOMEM,
        FsError::Invalid => libc::EINVAL,
        FsError::BadSeek => libc::ESPIPE,
        FsError::TooManyOpen => libc::EMFILE,
        FsError::Corrupt | FsError::Io => libc::EIO,
    }
}

fn system_time(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}

fn attr(stat: &Stat) -> FileAttr {
    let kind = match stat.kind {
        FileKind::Dir => FileType::Directory,
        FileKind::File => FileType::RegularFile,
    };
    FileAttr {
        ino: stat.ino,
        size: stat.size,
        blocks: (stat.size + 511) / 512,
        atime: system_time(stat.atime),
        mtime: system_time(stat.mtime),
        ctime: system_time(stat.ctime),
        crtime: system_time(stat.mtime),
        kind,
        perm: stat.perm,
        nlink: stat.nlink,
        uid: 0,
        gid: 0,
        rdev: 0,
        blksize: 512,
        flags: 0,
    }
}

/// Translate leading command-line arguments into mount options;
/// anything unknown is dropped with a warning.
pub fn mount_options(args: &[String]) -> Vec<MountOption> {
    let mut options = vec![MountOption::FSName("hdifat".to_string())];
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            // The session always runs in the foreground.
            "-f" | "--foreground" => {}
            "-o" => {
                let Some(list) = iter.next() else {
                    warn!("-o without an option list");
                    break;
                };
                for opt in list.split(',') {
                    match opt {
                        "ro" => options.push(MountOption::RO),
                        "allow_other" => options.push(MountOption::AllowOther),
                        "allow_root" => options.push(MountOption::AllowRoot),
                        "auto_unmount" => options.push(MountOption::AutoUnmount),
                        other => warn!("ignoring mount option {other}"),
                    }
                }
            }
            other => warn!("ignoring argument {other}"),
        }
    }
    options
}

impl Filesystem for HdiFuse {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(name) = name.to_str() else {
            reply.error(libc::EINVAL);
            return;
        };
        match self.locked().lookup(parent, name) {
            Ok(entry) => reply.entry(&TTL, &attr(&entry.stat), 0),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyAttr) {
        match self.locked().getattr(ino) {
            Ok(stat) => reply.attr(&TTL, &attr(&stat)),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.locked().opendir(ino) {
            Ok(fh) => reply.opened(fh, 0),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        if offset < 0 {
            reply.error(libc::EINVAL);
            return;
        }
        let entries = match self.locked().readdir(fh, offset as usize) {
            Ok(entries) => entries,
            Err(err) => {
                reply.error(errno(err));
                return;
            }
        };
        for (i, entry) in entries.iter().enumerate() {
            let kind = match entry.kind {
                FileKind::Dir => FileType::Directory,
                FileKind::File => FileType::RegularFile,
            };
            if reply.add(entry.ino, offset + i as i64 + 1, kind, &entry.name) {
                break;
            }
        }
        reply.ok();
    }

    fn releasedir(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        _flags: i32,
        reply: ReplyEmpty,
    ) {
        let _ = self.locked().releasedir(fh);
        reply.ok();
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        let access = flags & libc::O_ACCMODE;
        let open_flags = OpenFlags {
            write: access == libc::O_WRONLY || access == libc::O_RDWR,
            truncate: flags & libc::O_TRUNC != 0,
        };
        match self.locked().open(ino, open_flags) {
            Ok(fh) => reply.opened(fh, 0),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        if offset < 0 {
            reply.data(&[]);
            return;
        }
        match self.locked().read(fh, offset as u64, size as usize) {
            Ok(data) => reply.data(&data),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn write(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        offset: i64,
        data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        if offset < 0 {
            reply.error(libc::EINVAL);
            return;
        }
        match self.locked().write(fh, offset as u64, data) {
            Ok(written) => reply.written(written as u32),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn release(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        let _ = self.locked().release(fh);
        reply.ok();
    }

    fn create(
        &mut self,
        _req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        _mode: u32,
        _umask: u32,
        _flags: i32,
        reply: ReplyCreate,
    ) {
        let Some(name) = name.to_str() else {
            reply.error(libc::EINVAL);
            return;
        };
        match self.locked().create(parent, name) {
            Ok((entry, fh)) => reply.created(&TTL, &attr(&entry.stat), 0, fh, 0),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn unlink(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        let Some(name) = name.to_str() else {
            reply.error(libc::EINVAL);
            return;
        };
        match self.locked().unlink(parent, name) {
            Ok(()) => reply.ok(),
            Err(err) => reply.error(errno(err)),
        }
    }

    fn forget(&mut self, _req: &Request<'_>, ino: u64, nlookup: u64) {
        self.locked().forget(ino, nlookup);
    }
}
