//! The inode layer: bridges the stateful inode/handle mount protocol to
//! FAT's stateless on-disk directory entries.
//!
//! Every reachable directory entry gets an in-memory node keyed by a
//! monotonically assigned inode id. Nodes carry the entry's slot offset
//! into the image arena (never a pointer), a lookup refcount, and a
//! zombie flag so unlinked-while-open files are only reclaimed on the
//! last forget.

use std::collections::BTreeMap;

use fatvfs::{
    DirEntryOut, EntryOut, FileKind, FsError, FsResult, HandleId, InodeId, MountOps, OpenFlags,
    Stat,
};
use log::{debug, warn};

use crate::codec;
use crate::datetime;
use crate::dir::Container;
use crate::entry::{RawEntry, ATTR_DIRECTORY, DELETED};
use crate::volume::Fat12Volume;

/// The root inode id fixed by the mount protocol.
pub const ROOT_INO: InodeId = 1;
/// Capacity of the handle table.
pub const MAX_HANDLES: u64 = 128;

/// Directory nesting the mount walk will follow.
const MAX_DEPTH: u32 = 64;

const ROOT_SENTINEL_NAME: [u8; 11] = *b"root       ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which bytes back an inode's directory entry.
enum EntryRef {
    /// The synthetic root sentinel, not stored on disk.
    Root,
    /// A 32-byte slot at this absolute buffer offset.
    Slot(usize),
}

struct Node {
    parent: InodeId,
    entry: EntryRef,
    children: Vec<InodeId>,
    nlookup: u64,
    zombie: bool,
}

struct Handle {
    fh: HandleId,
    ino: InodeId,
}

/// A mounted volume: the inode tree, the handle table, and the arena.
pub struct Session {
    vol: Fat12Volume,
    nodes: BTreeMap<InodeId, Node>,
    handles: Vec<Handle>,
    next_ino: InodeId,
}

impl Session {
    /// Mirror the on-disk tree into inode nodes, rooted at inode 1.
    pub fn new(vol: Fat12Volume) -> Self {
        let mut session = Self {
            vol,
            nodes: BTreeMap::new(),
            handles: Vec::new(),
            next_ino: ROOT_INO + 1,
        };
        session.nodes.insert(
            ROOT_INO,
            Node {
                parent: 0,
                entry: EntryRef::Root,
                children: Vec::new(),
                nlookup: 0,
                zombie: false,
            },
        );
        for (offset, entry) in session.vol.dir_entries(Container::Root) {
            session.add_subtree(ROOT_INO, offset, &entry, 0);
        }
        session
    }

    pub fn volume(&self) -> &Fat12Volume {
        &self.vol
    }

    pub fn into_volume(self) -> Fat12Volume {
        self.vol
    }

    fn add_subtree(&mut self, parent: InodeId, offset: usize, entry: &RawEntry, depth: u32) {
        let ino = self.next_ino;
        self.next_ino += 1;
        self.nodes.insert(
            ino,
            Node {
                parent,
                entry: EntryRef::Slot(offset),
                children: Vec::new(),
                nlookup: 0,
                zombie: false,
            },
        );
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(ino);
        }
        if entry.is_directory() && !entry.is_dot_or_dotdot() {
            if depth >= MAX_DEPTH {
                warn!("directory nesting exceeds {MAX_DEPTH}, not descending");
                return;
            }
            for (child_offset, child) in self.vol.dir_entries(Container::Chain(entry.first_cluster))
            {
                self.add_subtree(ino, child_offset, &child, depth + 1);
            }
        }
    }

    fn node(&self, ino: InodeId) -> FsResult<&Node> {
        self.nodes.get(&ino).ok_or(FsError::NoEntry)
    }

    fn node_entry(&self, node: &Node) -> RawEntry {
        match node.entry {
            EntryRef::Root => RawEntry::new(ROOT_SENTINEL_NAME, ATTR_DIRECTORY),
            EntryRef::Slot(offset) => self.vol.read_entry(offset),
        }
    }

    fn container_of(&self, node: &Node) -> Container {
        match node.entry {
            EntryRef::Root => Container::Root,
            EntryRef::Slot(offset) => Container::Chain(self.vol.read_entry(offset).first_cluster),
        }
    }

    fn stat_of(&self, ino: InodeId) -> FsResult<Stat> {
        let node = self.node(ino)?;
        let entry = self.node_entry(node);
        let (kind, perm) = if entry.is_directory() {
            (FileKind::Dir, 0o555)
        } else {
            (FileKind::File, 0o444)
        };
        let mtime = datetime::decode(entry.write_date, entry.write_time);
        Ok(Stat {
            ino,
            size: entry.size as u64,
            kind,
            perm,
            nlink: 1,
            atime: datetime::decode(entry.access_date, 0),
            mtime,
            ctime: mtime,
        })
    }

    /// Visible (non-zombie) children of a directory node.
    fn visible_children(&self, node: &Node) -> Vec<InodeId> {
        node.children
            .iter()
            .copied()
            .filter(|ino| self.nodes.get(ino).is_some_and(|child| !child.zombie))
            .collect()
    }

    fn find_child(&self, parent: &Node, name: &str) -> Option<InodeId> {
        self.visible_children(parent).into_iter().find(|&ino| {
            let Some(child) = self.nodes.get(&ino) else {
                return false;
            };
            self.node_entry(child)
                .canonical_name()
                .eq_ignore_ascii_case(name)
        })
    }

    fn handle_in_use(&self, fh: HandleId) -> bool {
        self.handles.iter().any(|handle| handle.fh == fh)
    }

    /// Lowest handle id not currently in use.
    fn free_handle_id(&self) -> FsResult<HandleId> {
        (0..MAX_HANDLES)
            .find(|&fh| !self.handle_in_use(fh))
            .ok_or(FsError::TooManyOpen)
    }

    fn handle_ino(&self, fh: HandleId) -> Option<InodeId> {
        self.handles
            .iter()
            .find(|handle| handle.fh == fh)
            .map(|handle| handle.ino)
    }

    fn ino_in_use(&self, ino: InodeId) -> bool {
        self.handles.iter().any(|handle| handle.ino == ino)
    }

    /// Reclaim a zombie: release its chain, mark the slot deleted, and
    /// re-terminate the parent container.
    fn reap(&mut self, ino: InodeId) {
        let Some(node) = self.nodes.get(&ino) else {
            return;
        };
        let parent_ino = node.parent;
        let EntryRef::Slot(offset) = node.entry else {
            return;
        };
        debug!("reap inode {ino}");
        self.vol.unlink_file(offset);
        self.vol.set_entry_name0(offset, DELETED);
        match self.nodes.get(&parent_ino) {
            Some(parent) => {
                let container = self.container_of(parent);
                self.vol.compact_dir(container);
            }
            None => warn!("parent of inode {ino} not found while reaping"),
        }
        if let Some(parent) = self.nodes.get_mut(&parent_ino) {
            parent.children.retain(|&child| child != ino);
        }
        self.nodes.remove(&ino);
    }
}

impl MountOps for Session {
    fn lookup(&mut self, parent: InodeId, name: &str) -> FsResult<EntryOut> {
        let parent_node = self.node(parent)?;
        let Some(ino) = self.find_child(parent_node, name) else {
            debug!("lookup {name}: not found");
            return Err(FsError::NoEntry);
        };
        let stat = self.stat_of(ino)?;
        if let Some(child) = self.nodes.get_mut(&ino) {
            child.nlookup += 1;
        }
        Ok(EntryOut { ino, stat })
    }

    fn getattr(&mut self, ino: InodeId) -> FsResult<Stat> {
        self.stat_of(ino)
    }

    fn opendir(&mut self, ino: InodeId) -> FsResult<HandleId> {
        self.node(ino)?;
        let fh = self.free_handle_id()?;
        self.handles.push(Handle { fh, ino });
        Ok(fh)
    }

    fn readdir(&mut self, fh: HandleId, offset: usize) -> FsResult<Vec<DirEntryOut>> {
        let ino = self.handle_ino(fh).ok_or(FsError::NoEntry)?;
        let node = self.node(ino)?;
        let children = self.visible_children(node);
        let mut out = Vec::new();
        for &child_ino in children.iter().skip(offset) {
            let Some(child) = self.nodes.get(&child_ino) else {
                continue;
            };
            let entry = self.node_entry(child);
            out.push(DirEntryOut {
                ino: child_ino,
                kind: entry.kind(),
                name: entry.canonical_name(),
            });
        }
        Ok(out)
    }

    fn releasedir(&mut self, fh: HandleId) -> FsResult<()> {
        self.handles.retain(|handle| handle.fh != fh);
        Ok(())
    }

    fn open(&mut self, ino: InodeId, flags: OpenFlags) -> FsResult<HandleId> {
        let node = self.node(ino)?;
        let entry = self.node_entry(node);
        if entry.is_directory() {
            return Err(FsError::IsDir);
        }
        if flags.write && entry.is_read_only() {
            return Err(FsError::Access);
        }
        if flags.truncate {
            let EntryRef::Slot(offset) = node.entry else {
                return Err(FsError::Invalid);
            };
            self.vol.truncate_file(offset);
        }
        let fh = self.free_handle_id()?;
        self.handles.push(Handle { fh, ino });
        debug!("open inode {ino} as handle {fh}");
        Ok(fh)
    }

    fn read(&mut self, fh: HandleId, offset: u64, size: usize) -> FsResult<Vec<u8>> {
        let Some(ino) = self.handle_ino(fh) else {
            return Ok(Vec::new());
        };
        let node = self.node(ino)?;
        let entry = self.node_entry(node);
        self.vol.read_file(&entry, offset, size)
    }

    fn write(&mut self, fh: HandleId, offset: u64, data: &[u8]) -> FsResult<usize> {
        let ino = self.handle_ino(fh).ok_or(FsError::Invalid)?;
        let node = self.node(ino)?;
        let EntryRef::Slot(entry_offset) = node.entry else {
            return Err(FsError::IsDir);
        };
        let written = self.vol.write_file(entry_offset, offset, data)?;
        if written == 0 && !data.is_empty() {
            return Err(FsError::Space);
        }
        Ok(written)
    }

    fn release(&mut self, fh: HandleId) -> FsResult<()> {
        self.handles.retain(|handle| handle.fh != fh);
        Ok(())
    }

    fn create(&mut self, parent: InodeId, name: &str) -> FsResult<(EntryOut, HandleId)> {
        let raw_name = codec::dos_name(name).ok_or(FsError::Invalid)?;
        let parent_node = self.nodes.get(&parent).ok_or(FsError::NotDir)?;
        if !self.node_entry(parent_node).is_directory() {
            return Err(FsError::NotDir);
        }
        let container = self.container_of(parent_node);
        let fh = self.free_handle_id()?;
        let offset = self.vol.free_slot(container).ok_or(FsError::NoMem)?;

        let mut snapshot = [0u8; 32];
        snapshot.copy_from_slice(self.vol.slot(offset));
        self.vol.write_entry(offset, &RawEntry::new(raw_name, 0));
        let entry = self.vol.read_entry(offset);
        if !entry.is_valid() {
            self.vol.slot_mut(offset).copy_from_slice(&snapshot);
            return Err(FsError::Invalid);
        }

        let ino = self.next_ino;
        self.next_ino += 1;
        self.nodes.insert(
            ino,
            Node {
                parent,
                entry: EntryRef::Slot(offset),
                children: Vec::new(),
                nlookup: 1,
                zombie: false,
            },
        );
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(ino);
        }
        self.handles.push(Handle { fh, ino });
        debug!("create {name} as inode {ino}");
        let stat = self.stat_of(ino)?;
        Ok((EntryOut { ino, stat }, fh))
    }

    fn unlink(&mut self, parent: InodeId, name: &str) -> FsResult<()> {
        let parent_node = self.node(parent)?;
        let ino = self
            .find_child(parent_node, name)
            .ok_or(FsError::NoEntry)?;
        if self.ino_in_use(ino) {
            return Err(FsError::Busy);
        }
        debug!("unlink {name}: inode {ino} becomes a zombie");
        if let Some(node) = self.nodes.get_mut(&ino) {
            node.zombie = true;
        }
        Ok(())
    }

    fn forget(&mut self, ino: InodeId, nlookup: u64) {
        let Some(node) = self.nodes.get_mut(&ino) else {
            debug!("forget of unknown inode {ino}");
            return;
        };
        node.nlookup = node.nlookup.saturating_sub(nlookup);
        if node.nlookup == 0 && node.zombie {
            self.reap(ino);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::END_OF_DIR;
    use crate::mkimage::{self, VolumeParams};
    use crate::volume::EOC;

    fn blank_session(data_clusters: u16) -> Session {
        let params = VolumeParams {
            root_entries: 16,
            data_clusters,
            ..VolumeParams::default()
        };
        Session::new(Fat12Volume::parse(mkimage::format(&params)).unwrap())
    }

    /// Root with HELLO.TXT (cluster 2, 11 bytes) and SUB (cluster 3)
    /// holding dot entries plus the empty INNER.BIN.
    fn seeded_session() -> Session {
        let params = VolumeParams { root_entries: 16, ..VolumeParams::default() };
        let mut vol = Fat12Volume::parse(mkimage::format(&params)).unwrap();

        let root = vol.dir_slots(Container::Root);
        let mut hello = RawEntry::new(*b"HELLO   TXT", 0);
        hello.first_cluster = 2;
        hello.size = 11;
        hello.write_date = (9 << 9) | (6 << 5) | 4;
        vol.write_entry(root[0], &hello);
        vol.fat_set(2, EOC);
        vol.cluster_mut(2)[..11].copy_from_slice(b"hello world");

        let mut sub = RawEntry::new(*b"SUB        ", ATTR_DIRECTORY);
        sub.first_cluster = 3;
        vol.write_entry(root[1], &sub);
        vol.fat_set(3, EOC);

        let sub_slots = vol.dir_slots(Container::Chain(3));
        let mut dot = RawEntry::new(*b".          ", ATTR_DIRECTORY);
        dot.first_cluster = 3;
        vol.write_entry(sub_slots[0], &dot);
        let mut dotdot = RawEntry::new(*b"..         ", ATTR_DIRECTORY);
        dotdot.first_cluster = 0;
        vol.write_entry(sub_slots[1], &dotdot);
        vol.write_entry(sub_slots[2], &RawEntry::new(*b"INNER   BIN", 0));

        Session::new(vol)
    }

    fn readdir_names(session: &mut Session, ino: InodeId) -> Vec<String> {
        let fh = session.opendir(ino).unwrap();
        let names = session
            .readdir(fh, 0)
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        session.releasedir(fh).unwrap();
        names
    }

    #[test]
    fn load_and_list() {
        let mut session = seeded_session();
        assert_eq!(readdir_names(&mut session, ROOT_INO), ["HELLO.TXT", "SUB"]);

        let hello = session.lookup(ROOT_INO, "hello.txt").unwrap();
        assert_eq!(hello.stat.kind, FileKind::File);
        assert_eq!(hello.stat.perm, 0o444);
        assert_eq!(hello.stat.size, 11);

        let sub = session.lookup(ROOT_INO, "SUB").unwrap();
        assert_eq!(sub.stat.kind, FileKind::Dir);
        assert_eq!(sub.stat.perm, 0o555);

        let names = readdir_names(&mut session, sub.ino);
        assert!(names.contains(&"INNER.BIN".to_string()));

        let inner = session.lookup(sub.ino, "inner.bin").unwrap();
        assert_eq!(inner.stat.size, 0);
    }

    #[test]
    fn getattr_decodes_write_stamp() {
        let mut session = seeded_session();
        let hello = session.lookup(ROOT_INO, "HELLO.TXT").unwrap();
        let stat = session.getattr(hello.ino).unwrap();
        assert_eq!(stat.mtime, 612_921_600);
        assert_eq!(stat.ctime, stat.mtime);
        assert_eq!(stat.atime, datetime::DOS_EPOCH);
    }

    #[test]
    fn root_getattr() {
        let mut session = blank_session(64);
        let stat = session.getattr(ROOT_INO).unwrap();
        assert_eq!(stat.kind, FileKind::Dir);
        assert_eq!(stat.perm, 0o555);
        assert_eq!(stat.size, 0);
    }

    #[test]
    fn create_write_read_back() {
        let mut session = blank_session(64);
        let (entry, fh) = session.create(ROOT_INO, "a.txt").unwrap();
        assert_eq!(session.write(fh, 0, b"hello").unwrap(), 5);
        session.release(fh).unwrap();

        let found = session.lookup(ROOT_INO, "a.txt").unwrap();
        assert_eq!(found.ino, entry.ino);
        assert_eq!(found.stat.size, 5);

        let fh = session.open(found.ino, OpenFlags::default()).unwrap();
        assert_eq!(session.read(fh, 0, 5).unwrap(), b"hello");
        session.release(fh).unwrap();
    }

    #[test]
    fn grow_across_cluster_boundary() {
        let mut session = blank_session(64);
        let (entry, fh) = session.create(ROOT_INO, "b").unwrap();
        let data: Vec<u8> = (0..600u32).map(|i| i as u8).collect();
        assert_eq!(session.write(fh, 0, &data).unwrap(), 600);
        assert_eq!(session.getattr(entry.ino).unwrap().size, 600);

        let vol = session.volume();
        let slots = vol.dir_slots(Container::Root);
        let raw = vol.read_entry(slots[0]);
        let second = vol.fat_get(raw.first_cluster);
        assert!(vol.data_cluster_in_range(second));
        assert_eq!(vol.fat_get(second), EOC);

        assert_eq!(session.read(fh, 0, 600).unwrap(), data);
        session.release(fh).unwrap();
    }

    #[test]
    fn unlink_while_open_defers_deletion() {
        let mut session = blank_session(64);
        let (entry, fh) = session.create(ROOT_INO, "c").unwrap();
        session.write(fh, 0, b"payload").unwrap();
        session.release(fh).unwrap();
        let fh = session.open(entry.ino, OpenFlags::default()).unwrap();

        // An open handle blocks the unlink itself.
        assert_eq!(session.unlink(ROOT_INO, "c"), Err(FsError::Busy));
        session.release(fh).unwrap();
        session.unlink(ROOT_INO, "c").unwrap();

        assert_eq!(session.lookup(ROOT_INO, "c"), Err(FsError::NoEntry));
        // The entry still answers getattr through its inode id.
        assert_eq!(session.getattr(entry.ino).unwrap().size, 7);

        let free_before = session.volume().free_clusters();
        session.forget(entry.ino, 1);
        assert_eq!(session.getattr(entry.ino), Err(FsError::NoEntry));
        assert_eq!(session.volume().free_clusters(), free_before + 1);
        let slots = session.volume().dir_slots(Container::Root);
        assert_eq!(session.volume().slot(slots[0])[0], END_OF_DIR);
    }

    #[test]
    fn zombie_stays_readable_through_open_handle() {
        let mut session = blank_session(64);
        let (entry, fh) = session.create(ROOT_INO, "c").unwrap();
        session.write(fh, 0, b"still here").unwrap();
        session.release(fh).unwrap();

        // The kernel still holds the lookup reference from create, so
        // the inode survives the unlink and stays reachable by id.
        session.unlink(ROOT_INO, "c").unwrap();
        assert_eq!(session.lookup(ROOT_INO, "c"), Err(FsError::NoEntry));
        let fh = session.open(entry.ino, OpenFlags::default()).unwrap();
        assert_eq!(session.read(fh, 0, 10).unwrap(), b"still here");
        session.release(fh).unwrap();
        session.forget(entry.ino, 1);
        assert_eq!(session.getattr(entry.ino), Err(FsError::NoEntry));
    }

    #[test]
    fn truncate_on_open() {
        let mut session = blank_session(64);
        let (entry, fh) = session.create(ROOT_INO, "t.bin").unwrap();
        session.write(fh, 0, &[1u8; 700]).unwrap();
        session.release(fh).unwrap();
        let free_after_write = session.volume().free_clusters();

        let flags = OpenFlags { write: true, truncate: true };
        let fh = session.open(entry.ino, flags).unwrap();
        assert_eq!(session.getattr(entry.ino).unwrap().size, 0);
        assert_eq!(session.volume().free_clusters(), free_after_write + 2);
        assert_eq!(session.write(fh, 0, b"new").unwrap(), 3);
        assert_eq!(session.read(fh, 0, 16).unwrap(), b"new");
        session.release(fh).unwrap();
    }

    #[test]
    fn readonly_entry_refuses_write_open() {
        let mut session = seeded_session();
        let slots = session.volume().dir_slots(Container::Root);
        let ino = session.lookup(ROOT_INO, "HELLO.TXT").unwrap().ino;
        // Flip the on-disk read-only bit, then try a write-open.
        let offset = slots[0];
        let mut raw = session.vol.read_entry(offset);
        raw.attr |= crate::entry::ATTR_READ_ONLY;
        session.vol.write_entry(offset, &raw);
        let flags = OpenFlags { write: true, truncate: false };
        assert_eq!(session.open(ino, flags), Err(FsError::Access));
        assert!(session.open(ino, OpenFlags::default()).is_ok());
    }

    #[test]
    fn directories_cannot_be_opened_as_files() {
        let mut session = seeded_session();
        let sub = session.lookup(ROOT_INO, "SUB").unwrap();
        assert_eq!(session.open(sub.ino, OpenFlags::default()), Err(FsError::IsDir));
        assert_eq!(session.open(ROOT_INO, OpenFlags::default()), Err(FsError::IsDir));
    }

    #[test]
    fn create_in_subdirectory() {
        let mut session = seeded_session();
        let sub = session.lookup(ROOT_INO, "SUB").unwrap();
        let (_, fh) = session.create(sub.ino, "Ädf.TxT").unwrap();
        session.write(fh, 0, b"latin").unwrap();
        session.release(fh).unwrap();
        let names = readdir_names(&mut session, sub.ino);
        assert!(names.contains(&"ÄDF.TXT".to_string()));
        assert!(session.lookup(sub.ino, "Ädf.TxT").is_ok());
    }

    #[test]
    fn create_rejects_bad_names() {
        let mut session = blank_session(64);
        assert_eq!(
            session.create(ROOT_INO, "much_too_long_a_name.txt"),
            Err(FsError::Invalid)
        );
        assert_eq!(session.create(ROOT_INO, "漢字"), Err(FsError::Invalid));
    }

    #[test]
    fn create_fails_when_the_container_is_full() {
        let mut session = blank_session(64);
        for i in 0..16 {
            let (_, fh) = session.create(ROOT_INO, &format!("F{i}")).unwrap();
            session.release(fh).unwrap();
        }
        assert_eq!(session.create(ROOT_INO, "ONEMORE"), Err(FsError::NoMem));
    }

    #[test]
    fn handle_table_is_bounded() {
        let mut session = seeded_session();
        let ino = session.lookup(ROOT_INO, "HELLO.TXT").unwrap().ino;
        let mut handles = Vec::new();
        for _ in 0..MAX_HANDLES {
            handles.push(session.open(ino, OpenFlags::default()).unwrap());
        }
        assert_eq!(
            session.open(ino, OpenFlags::default()),
            Err(FsError::TooManyOpen)
        );
        for fh in handles {
            session.release(fh).unwrap();
        }
        assert!(session.open(ino, OpenFlags::default()).is_ok());
    }

    #[test]
    fn enospc_write_leaves_size_alone() {
        let mut session = blank_session(6);
        let (entry, fh) = session.create(ROOT_INO, "big").unwrap();
        assert_eq!(session.write(fh, 0, &[7u8; 2048]).unwrap(), 2048);
        assert_eq!(session.write(fh, 2048, &[8u8; 10]), Err(FsError::Space));
        assert_eq!(session.getattr(entry.ino).unwrap().size, 2048);
        session.release(fh).unwrap();
    }

    #[test]
    fn no_cluster_is_owned_twice() {
        let mut session = blank_session(64);
        let mut files = Vec::new();
        for i in 0..4 {
            let (entry, fh) = session.create(ROOT_INO, &format!("F{i}")).unwrap();
            session.write(fh, 0, &vec![i as u8; 700]).unwrap();
            session.release(fh).unwrap();
            files.push(entry.ino);
        }
        let vol = session.volume();
        let mut owned = std::collections::BTreeSet::new();
        for (_, entry) in vol.dir_entries(Container::Root) {
            let mut cluster = entry.first_cluster;
            while vol.data_cluster_in_range(cluster) {
                assert!(owned.insert(cluster), "cluster {cluster} owned twice");
                match vol.next_cluster(cluster) {
                    Some(next) => cluster = next,
                    None => break,
                }
            }
        }
        assert_eq!(owned.len(), 8);
    }
}
