//! Directory containers: slot enumeration, entry allocation, compaction.

use crate::entry::{RawEntry, END_OF_DIR, FIRST_CLUSTER_LOW_OFFSET, SIZE_OFFSET};
use crate::bpb::{write_u16, write_u32};
use crate::volume::{Fat12Volume, DIR_ENTRY_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where a directory keeps its entry slots.
pub enum Container {
    /// The fixed-size root region.
    Root,
    /// The cluster chain starting at this cluster.
    Chain(u16),
}

impl Fat12Volume {
    /// Absolute buffer offsets of every slot in the container, in
    /// physical order. Scanning walks all slots, not just up to the
    /// first terminator, so compaction can see the whole container.
    pub fn dir_slots(&self, dir: Container) -> Vec<usize> {
        match dir {
            Container::Root => {
                let region = self.root_region();
                (0..self.root_entries() as usize)
                    .map(|i| region.offset + i * DIR_ENTRY_SIZE)
                    .collect()
            }
            Container::Chain(first) => {
                let per_cluster = self.cluster_size() / DIR_ENTRY_SIZE;
                let mut slots = Vec::new();
                let mut cluster = first;
                let mut hops = 0u32;
                while self.data_cluster_in_range(cluster) {
                    let base = self.cluster_offset(cluster);
                    slots.extend((0..per_cluster).map(|i| base + i * DIR_ENTRY_SIZE));
                    hops += 1;
                    if hops > self.max_cluster() as u32 {
                        break;
                    }
                    match self.next_cluster(cluster) {
                        Some(next) => cluster = next,
                        None => break,
                    }
                }
                slots
            }
        }
    }

    pub fn read_entry(&self, offset: usize) -> RawEntry {
        RawEntry::parse(self.slot(offset))
    }

    pub fn write_entry(&mut self, offset: usize, entry: &RawEntry) {
        entry.store(self.slot_mut(offset));
    }

    /// Update only the size field, leaving unmodelled bytes alone.
    pub fn set_entry_size(&mut self, offset: usize, size: u32) {
        write_u32(self.slot_mut(offset), SIZE_OFFSET, size);
    }

    /// Update only the start-cluster field.
    pub fn set_entry_first_cluster(&mut self, offset: usize, cluster: u16) {
        write_u16(self.slot_mut(offset), FIRST_CLUSTER_LOW_OFFSET, cluster);
    }

    pub fn set_entry_name0(&mut self, offset: usize, byte: u8) {
        self.slot_mut(offset)[0] = byte;
    }

    /// Zero the whole 32-byte slot.
    pub fn clear_entry(&mut self, offset: usize) {
        self.slot_mut(offset).fill(0);
    }

    /// The valid entries of a container with their slot offsets.
    pub fn dir_entries(&self, dir: Container) -> Vec<(usize, RawEntry)> {
        self.dir_slots(dir)
            .into_iter()
            .map(|offset| (offset, self.read_entry(offset)))
            .filter(|(_, entry)| entry.is_valid())
            .collect()
    }

    /// First slot not holding a valid entry, for create. `None` when the
    /// container is exhausted; chains are not extended.
    pub fn free_slot(&self, dir: Container) -> Option<usize> {
        self.dir_slots(dir)
            .into_iter()
            .find(|&offset| !self.read_entry(offset).is_valid())
    }

    /// Replace trailing invalid entries' first byte with the
    /// end-of-directory terminator, walking the container's slots in
    /// reverse, so early-terminating scanners miss no live entry.
    pub fn compact_dir(&mut self, dir: Container) {
        for offset in self.dir_slots(dir).into_iter().rev() {
            if self.read_entry(offset).is_valid() {
                break;
            }
            self.set_entry_name0(offset, END_OF_DIR);
        }
    }
}
