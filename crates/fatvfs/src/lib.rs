//! Shared filesystem types and the mount operation contract.

use core::fmt;

/// Inode identifier. Inode 1 is the root directory.
pub type InodeId = u64;

/// File handle identifier drawn from the session's handle table.
pub type HandleId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Errors returned by filesystem operations.
pub enum FsError {
    /// Missing child or missing inode.
    NoEntry,
    /// Parent inode is not a directory.
    NotDir,
    /// Tried to open a directory as a regular file.
    IsDir,
    /// Write-open of a read-only entry.
    Access,
    /// Unlink of a file that still has open handles.
    Busy,
    /// Cluster allocation failed with nothing written.
    Space,
    /// Directory container has no free entry slot.
    NoMem,
    /// Malformed name or argument.
    Invalid,
    /// Write beyond end-of-file without a hole to land in.
    BadSeek,
    /// Handle table exhausted.
    TooManyOpen,
    /// On-disk structure failed validation.
    Corrupt,
    /// Host I/O failure while loading or persisting the image.
    Io,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FsError::NoEntry => "no such entry",
            FsError::NotDir => "not a directory",
            FsError::IsDir => "is a directory",
            FsError::Access => "access denied",
            FsError::Busy => "entry is busy",
            FsError::Space => "no space left on volume",
            FsError::NoMem => "no free directory slot",
            FsError::Invalid => "invalid argument",
            FsError::BadSeek => "seek past end of chain",
            FsError::TooManyOpen => "too many open handles",
            FsError::Corrupt => "corrupt volume structure",
            FsError::Io => "host i/o error",
        };
        f.write_str(msg)
    }
}

/// Result type for filesystem operations.
pub type FsResult<T> = core::result::Result<T, FsError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// File type identifiers.
pub enum FileKind {
    File,
    Dir,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Metadata for one inode, as replied to getattr/lookup.
pub struct Stat {
    pub ino: InodeId,
    pub size: u64,
    pub kind: FileKind,
    /// Permission bits only; the type bits come from `kind`.
    pub perm: u16,
    pub nlink: u32,
    /// Unix seconds, derived from the last-access date.
    pub atime: i64,
    /// Unix seconds, derived from the write date and time.
    pub mtime: i64,
    /// Unix seconds; FAT has no change stamp, mirrors `mtime`.
    pub ctime: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Reply to lookup and create: the child inode and its attributes.
pub struct EntryOut {
    pub ino: InodeId,
    pub stat: Stat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One directory entry as replied to readdir.
pub struct DirEntryOut {
    pub ino: InodeId,
    pub kind: FileKind,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Open flags the session honours.
pub struct OpenFlags {
    pub write: bool,
    pub truncate: bool,
}

/// The operation contract a mountable session satisfies.
///
/// Every method is one complete filesystem request; the embedding
/// serializes calls behind a single lock for their entire duration.
pub trait MountOps {
    /// Resolve `name` under `parent` (case-insensitive) and take one
    /// lookup reference on the child.
    fn lookup(&mut self, parent: InodeId, name: &str) -> FsResult<EntryOut>;
    /// Attributes of an inode.
    fn getattr(&mut self, ino: InodeId) -> FsResult<Stat>;
    /// Open a directory, returning a handle.
    fn opendir(&mut self, ino: InodeId) -> FsResult<HandleId>;
    /// List the children of an open directory starting at `offset`.
    fn readdir(&mut self, fh: HandleId, offset: usize) -> FsResult<Vec<DirEntryOut>>;
    /// Close a directory handle.
    fn releasedir(&mut self, fh: HandleId) -> FsResult<()>;
    /// Open a regular file, honouring write and truncate flags.
    fn open(&mut self, ino: InodeId, flags: OpenFlags) -> FsResult<HandleId>;
    /// Read up to `size` bytes at `offset`; short reads are legal.
    fn read(&mut self, fh: HandleId, offset: u64, size: usize) -> FsResult<Vec<u8>>;
    /// Write bytes at `offset`, growing the file on demand.
    fn write(&mut self, fh: HandleId, offset: u64, data: &[u8]) -> FsResult<usize>;
    /// Close a file handle.
    fn release(&mut self, fh: HandleId) -> FsResult<()>;
    /// Create a regular file under `parent` and open it.
    fn create(&mut self, parent: InodeId, name: &str) -> FsResult<(EntryOut, HandleId)>;
    /// Unlink by name; deferred to forget while handles remain open.
    fn unlink(&mut self, parent: InodeId, name: &str) -> FsResult<()>;
    /// Drop `nlookup` references; finalizes zombie inodes at zero.
    fn forget(&mut self, ino: InodeId, nlookup: u64);
}
