//! Byte-range file I/O over cluster chains.

use fatvfs::{FsError, FsResult};
use log::debug;

use crate::entry::RawEntry;
use crate::fat;
use crate::volume::{Fat12Volume, EOC};

impl Fat12Volume {
    /// Read up to `size` bytes of a regular file starting at `offset`.
    ///
    /// Never reads past the recorded file size; a chain that ends before
    /// the requested range is satisfied yields a short read.
    pub fn read_file(&self, entry: &RawEntry, offset: u64, size: usize) -> FsResult<Vec<u8>> {
        let file_size = entry.size as u64;
        if size == 0 || offset >= file_size {
            return Ok(Vec::new());
        }
        let offset = offset as usize;
        let to_read = size.min((file_size as usize) - offset);

        let pos = self.seek_chain(entry.first_cluster, offset);
        if pos.skipped + pos.intra != offset {
            debug!("cannot seek to offset {offset}");
            return Err(FsError::Invalid);
        }

        let mut out = Vec::with_capacity(to_read);
        let mut cluster = pos.cluster;
        let mut intra = pos.intra;
        while out.len() < to_read && self.data_cluster_in_range(cluster) {
            let payload = self.cluster(cluster);
            let take = (payload.len() - intra).min(to_read - out.len());
            out.extend_from_slice(&payload[intra..intra + take]);
            intra = 0;
            match self.next_cluster(cluster) {
                Some(next) => cluster = next,
                None => break,
            }
        }
        Ok(out)
    }

    /// Write `data` at `offset`, allocating clusters on demand.
    ///
    /// The seek must land exactly on `offset`; a file whose chain is
    /// shorter than that fails with [`FsError::BadSeek`]. When the
    /// volume fills up mid-write the count written so far is returned
    /// and the file size covers exactly those bytes.
    pub fn write_file(&mut self, entry_offset: usize, offset: u64, data: &[u8]) -> FsResult<usize> {
        let entry = self.read_entry(entry_offset);
        let offset = offset as usize;

        let mut pos = self.seek_chain(entry.first_cluster, offset);
        if pos.skipped + pos.intra != offset {
            debug!(
                "seek to offset {offset} failed, reached {}",
                pos.skipped + pos.intra
            );
            return Err(FsError::BadSeek);
        }
        if data.is_empty() {
            return Ok(0);
        }

        if entry.first_cluster == 0 {
            // Empty file: give it a first cluster before the loop.
            let Some(first) = self.find_free_cluster() else {
                return Ok(0);
            };
            self.fat_set(first, EOC);
            self.set_entry_first_cluster(entry_offset, first);
            pos.cluster = first;
        } else if fat::is_eoc(pos.cluster) {
            // Landed one past the chain: append a cluster to the tail.
            if pos.intra != 0 {
                return Err(FsError::BadSeek);
            }
            let Some(tail) = self.chain_tail(entry.first_cluster) else {
                return Err(FsError::Corrupt);
            };
            let Some(fresh) = self.find_free_cluster() else {
                return Ok(0);
            };
            self.fat_set(fresh, EOC);
            self.fat_set(tail, fresh);
            pos.cluster = fresh;
        } else if !self.data_cluster_in_range(pos.cluster) {
            return Err(FsError::Corrupt);
        }

        let mut written = 0usize;
        let mut cluster = pos.cluster;
        let mut intra = pos.intra;
        loop {
            let payload = self.cluster_mut(cluster);
            let take = (payload.len() - intra).min(data.len() - written);
            payload[intra..intra + take].copy_from_slice(&data[written..written + take]);
            written += take;
            intra = 0;
            if written == data.len() {
                break;
            }
            let next = self.fat_get(cluster);
            if fat::is_eoc(next) {
                // Mark the fresh cluster end-of-chain before linking it,
                // so no reader ever follows a link into a free slot.
                let Some(fresh) = self.find_free_cluster() else {
                    break;
                };
                self.fat_set(fresh, EOC);
                self.fat_set(cluster, fresh);
                cluster = fresh;
            } else if self.data_cluster_in_range(next) {
                cluster = next;
            } else {
                debug!("chain of entry at {entry_offset:#x} links to {next:#05X}");
                break;
            }
        }

        let size = self.read_entry(entry_offset).size as usize;
        self.set_entry_size(entry_offset, size.max(offset + written) as u32);
        Ok(written)
    }

    /// Release the file's chain and record it as empty.
    pub fn truncate_file(&mut self, entry_offset: usize) {
        let entry = self.read_entry(entry_offset);
        if entry.first_cluster >= 2 {
            self.free_chain(entry.first_cluster);
        }
        self.set_entry_first_cluster(entry_offset, 0);
        self.set_entry_size(entry_offset, 0);
    }

    /// Release the file's chain and zero its directory slot.
    pub fn unlink_file(&mut self, entry_offset: usize) {
        let entry = self.read_entry(entry_offset);
        if entry.first_cluster >= 2 {
            self.free_chain(entry.first_cluster);
        }
        self.clear_entry(entry_offset);
    }
}
