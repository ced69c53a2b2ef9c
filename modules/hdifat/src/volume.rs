//! FAT12 volume layout: canonical regions derived over a byte-buffer arena.

use fatvfs::{FsError, FsResult};
use log::{debug, warn};

use crate::bpb::{self, Bpb};

/// Size of one directory entry slot.
pub const DIR_ENTRY_SIZE: usize = 32;
/// The end-of-chain marker this engine writes.
pub const EOC: u16 = 0xFFF;
/// Values at or above this read as end-of-chain.
pub const EOC_MIN: u16 = 0xFF8;
/// Marker for an unusable cluster.
pub const BAD_CLUSTER: u16 = 0xFF7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A byte range inside the image buffer.
pub struct Region {
    pub offset: usize,
    pub len: usize,
}

/// A validated FAT12 volume over an owned image buffer.
///
/// All on-disk structures are addressed as offsets into the buffer, so
/// directory-entry references stay stable across mutations.
pub struct Fat12Volume {
    buf: Vec<u8>,
    bpb: Bpb,
    volume: Region,
    fat: Region,
    fat_size: usize,
    root_dir: Region,
    data: Region,
    cluster_size: usize,
    max_cluster: u16,
}

impl Fat12Volume {
    /// Locate and validate the first FAT12 volume in the buffer.
    pub fn parse(buf: Vec<u8>) -> FsResult<Self> {
        let (start, bpb) = bpb::scan(&buf)?;
        let volume_len = bpb.volume_bytes();
        if volume_len > buf.len() - start {
            warn!("volume size exceeds the remaining buffer");
            return Err(FsError::Corrupt);
        }
        let volume = Region { offset: start, len: volume_len };

        let fat_size = bpb.fat_bytes();
        let fat_region_size = bpb.fat_count as usize * fat_size;
        let fat_offset = bpb.reserved_bytes();
        if fat_offset + fat_region_size > volume_len {
            warn!("not enough volume left to hold the FAT copies");
            return Err(FsError::Corrupt);
        }
        let fat = Region { offset: start + fat_offset, len: fat_region_size };

        let root_dir_offset = fat_offset + fat_region_size;
        let root_dir_size = bpb.root_entries as usize * DIR_ENTRY_SIZE;
        let data_offset = root_dir_offset + root_dir_size;
        let data_size = volume_len
            .checked_sub(fat_region_size + root_dir_size + bpb.reserved_bytes())
            .ok_or(FsError::Corrupt)?;
        let root_dir = Region { offset: start + root_dir_offset, len: root_dir_size };
        let data = Region { offset: start + data_offset, len: data_size };

        let cluster_size = bpb.cluster_bytes();
        let max_cluster = (data_size / cluster_size)
            .min(4094)
            .min(fat_size * 8 / 12) as u16;
        debug!(
            "volume at {:#x}: fat {:#x}+{:#x}, root {:#x}+{:#x}, data {:#x}+{:#x}, \
             cluster size {}, max cluster {}",
            start, fat.offset, fat.len, root_dir.offset, root_dir.len, data.offset, data.len,
            cluster_size, max_cluster
        );

        let vol = Self {
            buf,
            bpb,
            volume,
            fat,
            fat_size,
            root_dir,
            data,
            cluster_size,
            max_cluster,
        };
        vol.check_fat_copies()?;
        vol.check_reserved_entries();
        Ok(vol)
    }

    /// Verify that every redundant FAT copy matches FAT 0 byte for byte.
    fn check_fat_copies(&self) -> FsResult<()> {
        for i in 0..self.bpb.fat_count.saturating_sub(1) as usize {
            let a = self.fat.offset + i * self.fat_size;
            let b = a + self.fat_size;
            if self.buf[a..a + self.fat_size] != self.buf[b..b + self.fat_size] {
                warn!("FAT {} and {} do not match", i, i + 1);
                return Err(FsError::Corrupt);
            }
        }
        Ok(())
    }

    /// Entry 0 carries the media type, entry 1 the end-of-chain marker.
    /// Violations are reported but tolerated.
    fn check_reserved_entries(&self) {
        let expected = 0xF00 | self.bpb.media_type as u16;
        if self.fat_get(0) != expected {
            warn!(
                "FAT entry 0 is {:#05X}, expected {:#05X}",
                self.fat_get(0),
                expected
            );
        }
        if self.fat_get(1) != EOC {
            warn!("FAT entry 1 is {:#05X}, expected 0xFFF", self.fat_get(1));
        }
    }

    /// Copy FAT 0 over every other copy, restoring redundancy before the
    /// image is persisted.
    pub fn sync_fats(&mut self) {
        for i in 1..self.bpb.fat_count as usize {
            let (first, rest) = self.buf[self.fat.offset..].split_at_mut(i * self.fat_size);
            rest[..self.fat_size].copy_from_slice(&first[..self.fat_size]);
        }
    }

    pub fn bpb(&self) -> &Bpb {
        &self.bpb
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buf
    }

    pub fn volume_region(&self) -> Region {
        self.volume
    }

    pub fn root_region(&self) -> Region {
        self.root_dir
    }

    pub fn data_region(&self) -> Region {
        self.data
    }

    pub fn root_entries(&self) -> u16 {
        self.bpb.root_entries
    }

    pub fn cluster_size(&self) -> usize {
        self.cluster_size
    }

    /// One past the highest usable cluster index.
    pub fn max_cluster(&self) -> u16 {
        self.max_cluster
    }

    /// The first FAT copy.
    pub fn fat_slice(&self) -> &[u8] {
        &self.buf[self.fat.offset..self.fat.offset + self.fat_size]
    }

    pub(crate) fn fat_bytes(&self) -> &[u8] {
        self.fat_slice()
    }

    pub(crate) fn fat_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.fat.offset..self.fat.offset + self.fat_size]
    }

    /// Whether `cluster` addresses a slot inside the data region.
    pub fn data_cluster_in_range(&self, cluster: u16) -> bool {
        (2..self.max_cluster).contains(&cluster)
    }

    /// Absolute buffer offset of a data cluster's payload.
    pub fn cluster_offset(&self, cluster: u16) -> usize {
        self.data.offset + (cluster as usize - 2) * self.cluster_size
    }

    /// Payload bytes of a data cluster.
    pub fn cluster(&self, cluster: u16) -> &[u8] {
        let offset = self.cluster_offset(cluster);
        &self.buf[offset..offset + self.cluster_size]
    }

    pub fn cluster_mut(&mut self, cluster: u16) -> &mut [u8] {
        let offset = self.cluster_offset(cluster);
        &mut self.buf[offset..offset + self.cluster_size]
    }

    /// One 32-byte directory slot at an absolute buffer offset.
    pub fn slot(&self, offset: usize) -> &[u8] {
        &self.buf[offset..offset + DIR_ENTRY_SIZE]
    }

    pub fn slot_mut(&mut self, offset: usize) -> &mut [u8] {
        &mut self.buf[offset..offset + DIR_ENTRY_SIZE]
    }
}
