// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

//! A live, mutable view over a single `.mca` region file: sector
//! allocation, header I/O, compression framing, and a chunk-column cache.
//!
//! Superseds the teacher's mmap-based `anvil::access::Region` (read-only,
//! no free-sector tracking) and `anvil::encode::RegionWriter`
//! (single-shot bulk writer with no reuse of existing sectors) — a memory
//! map can't be grown in place when a write appends past EOF, and can't
//! safely coexist with the in-place, mutate-through-cache write path this
//! type needs.

use crate::anvil::{ChunkLocation, CompressionType, SECTOR_SIZE};
use crate::chunk::ChunkColumn;
use crate::error::{Error, Result};
use crate::nbt::encode::write_named_tag;
use crate::nbt::parse::parse_named_tag;
use dashmap::DashMap;
use flate2::Compression;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Bytes reserved for the two 4 KiB header tables.
const HEADER_SIZE: u64 = (SECTOR_SIZE * 2) as u64;

/// A region holds at most this many sectors (1 MiB) per chunk; `write_column`
/// fails with [`Error::Capacity`] at or above this.
const MAX_SECTORS_PER_CHUNK: usize = 256;

/// Maps an absolute block coordinate to its containing chunk coordinate.
pub fn block_to_chunk(block: i32) -> i32 {
    block >> 4
}

/// Maps an absolute chunk coordinate to its containing region coordinate.
pub fn chunk_to_region(chunk: i32) -> i32 {
    chunk >> 5
}

/// Maps an absolute chunk coordinate to its region-local index (`0..32`).
pub fn chunk_inside_region(chunk: i32) -> i32 {
    chunk & 31
}

/// Maps an absolute block coordinate to its chunk-local index (`0..16`).
pub fn block_inside_chunk(block: i32) -> i32 {
    block & 15
}

fn slot_index(chunk_x: i32, chunk_z: i32) -> usize {
    (chunk_inside_region(chunk_x) + chunk_inside_region(chunk_z) * 32) as usize
}

struct Inner {
    file: File,
    /// One entry per 4 KiB sector currently spanned by the file; `true` = free.
    free_sectors: Vec<bool>,
    locations: [ChunkLocation; 1024],
    timestamps: [u32; 1024],
}

/// A random-access, mutable `.mca` region file.
///
/// Owns a `std::fs::File` directly (no mmap) so that writes can append
/// past the current end of file and reuse sectors freed by overwritten
/// chunks. Safe to share across threads: `Arc<RegionFile>` plus concurrent
/// calls to any method is the intended usage.
pub struct RegionFile {
    region_x: i32,
    region_z: i32,
    inner: Mutex<Inner>,
    cache: DashMap<usize, Arc<Mutex<ChunkColumn>>>,
}

impl RegionFile {
    /// Opens (creating if absent) the region file at `path`, covering
    /// chunk coordinates in `[region_x*32, region_x*32+32)` x similarly
    /// for z. Initializes the 8 KiB header if the file is new or short,
    /// then builds the free-sector bitmap from the existing locations
    /// table.
    pub fn open<P: AsRef<Path>>(path: P, region_x: i32, region_z: i32) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let len = file.seek(SeekFrom::End(0))?;
        if len < HEADER_SIZE {
            file.seek(SeekFrom::Start(0))?;
            file.write_all(&vec![0u8; HEADER_SIZE as usize])?;
        }
        let len = file.seek(SeekFrom::End(0))?.max(HEADER_SIZE);
        let padded_len = len.div_ceil(SECTOR_SIZE as u64) * SECTOR_SIZE as u64;
        if padded_len != len {
            file.set_len(padded_len)?;
        }

        file.seek(SeekFrom::Start(0))?;
        let mut header_buf = vec![0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header_buf)?;

        let mut locations = [ChunkLocation {
            offset: 0,
            sector_count: 0,
        }; 1024];
        for i in 0..1024 {
            let start = i * 4;
            let offset = ((header_buf[start] as u32) << 16)
                | ((header_buf[start + 1] as u32) << 8)
                | (header_buf[start + 2] as u32);
            locations[i] = ChunkLocation {
                offset,
                sector_count: header_buf[start + 3],
            };
        }

        let mut timestamps = [0u32; 1024];
        for i in 0..1024 {
            let start = SECTOR_SIZE + i * 4;
            timestamps[i] = u32::from_be_bytes([
                header_buf[start],
                header_buf[start + 1],
                header_buf[start + 2],
                header_buf[start + 3],
            ]);
        }

        let sector_count = (padded_len / SECTOR_SIZE as u64) as usize;
        let mut free_sectors = vec![true; sector_count];
        if sector_count >= 2 {
            free_sectors[0] = false;
            free_sectors[1] = false;
        }
        for location in &locations {
            if location.offset == 0 {
                continue;
            }
            let start = location.offset as usize;
            let end = start + location.sector_count as usize;
            if end > free_sectors.len() {
                tracing::warn!(
                    offset = start,
                    sector_count = location.sector_count,
                    "region header references sectors past end of file, ignoring"
                );
                continue;
            }
            for slot in &mut free_sectors[start..end] {
                *slot = false;
            }
        }

        Ok(Self {
            region_x,
            region_z,
            inner: Mutex::new(Inner {
                file,
                free_sectors,
                locations,
                timestamps,
            }),
            cache: DashMap::new(),
        })
    }

    fn check_region(&self, chunk_x: i32, chunk_z: i32) -> Result<()> {
        if chunk_to_region(chunk_x) != self.region_x || chunk_to_region(chunk_z) != self.region_z
        {
            return Err(Error::OutOfRange(format!(
                "chunk ({chunk_x}, {chunk_z}) is not inside region ({}, {})",
                self.region_x, self.region_z
            )));
        }
        Ok(())
    }

    /// `true` if the header (or the cache) carries data for this chunk.
    pub fn has_chunk(&self, chunk_x: i32, chunk_z: i32) -> Result<bool> {
        self.check_region(chunk_x, chunk_z)?;
        let index = slot_index(chunk_x, chunk_z);
        if self.cache.contains_key(&index) {
            return Ok(true);
        }
        let inner = self.inner.lock().expect("region mutex poisoned");
        Ok(inner.locations[index].offset != 0)
    }

    /// `true` if this chunk is currently materialized in the in-memory cache.
    pub fn has_loaded_chunk(&self, chunk_x: i32, chunk_z: i32) -> Result<bool> {
        self.check_region(chunk_x, chunk_z)?;
        Ok(self.cache.contains_key(&slot_index(chunk_x, chunk_z)))
    }

    /// Drops a chunk from the cache without persisting it.
    pub fn forget(&self, chunk_x: i32, chunk_z: i32) -> Result<()> {
        self.check_region(chunk_x, chunk_z)?;
        self.cache.remove(&slot_index(chunk_x, chunk_z));
        Ok(())
    }

    /// Reads a chunk column, consulting the cache first and falling back
    /// to disk on a miss. Returns `Ok(None)` if the slot has never been
    /// written.
    pub fn get_chunk(
        &self,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<Option<Arc<Mutex<ChunkColumn>>>> {
        self.check_region(chunk_x, chunk_z)?;
        let index = slot_index(chunk_x, chunk_z);
        if let Some(existing) = self.cache.get(&index) {
            return Ok(Some(existing.clone()));
        }

        let mut inner = self.inner.lock().expect("region mutex poisoned");
        let location = inner.locations[index];
        if location.offset == 0 {
            return Ok(None);
        }

        let column = read_column_at(&mut inner.file, location)?;
        drop(inner);

        let arc = self
            .cache
            .entry(index)
            .or_insert_with(|| Arc::new(Mutex::new(column)))
            .clone();
        Ok(Some(arc))
    }

    /// Like [`Self::get_chunk`], but materializes an empty column (with
    /// the given `data_version`) into the cache on a miss instead of
    /// returning `None`.
    pub fn get_or_create_chunk(
        &self,
        chunk_x: i32,
        chunk_z: i32,
        data_version: i32,
    ) -> Result<Arc<Mutex<ChunkColumn>>> {
        if let Some(existing) = self.get_chunk(chunk_x, chunk_z)? {
            return Ok(existing);
        }
        let index = slot_index(chunk_x, chunk_z);
        let arc = self
            .cache
            .entry(index)
            .or_insert_with(|| {
                Arc::new(Mutex::new(ChunkColumn::new(chunk_x, chunk_z, data_version)))
            })
            .clone();
        Ok(arc)
    }

    /// Serializes, compresses, and persists a chunk column, reusing freed
    /// sectors where possible and appending to EOF otherwise. Also
    /// installs the (possibly new) column into the cache.
    ///
    /// Follows an allocate-new / write / relink / free-old sequence so a
    /// crash partway through leaves the previous copy (if any) intact and
    /// readable.
    pub fn write_column(&self, column: ChunkColumn) -> Result<()> {
        self.check_region(column.x(), column.z())?;
        let index = slot_index(column.x(), column.z());

        let mut raw = Vec::new();
        write_named_tag(&mut raw, "", &column.to_nbt())?;

        let mut compressed = Vec::new();
        let mut encoder = ZlibEncoder::new(&mut compressed, Compression::default());
        encoder.write_all(&raw)?;
        encoder.finish()?;

        // length field covers the compression-type byte plus the payload.
        let payload_len = compressed.len() + 1;
        let total_bytes = 4 + payload_len;
        let sector_count = total_bytes.div_ceil(SECTOR_SIZE);
        if sector_count >= MAX_SECTORS_PER_CHUNK {
            return Err(Error::Capacity(format!(
                "chunk ({}, {}) serializes to {sector_count} sectors, >= {MAX_SECTORS_PER_CHUNK} cap",
                column.x(),
                column.z()
            )));
        }

        let mut inner = self.inner.lock().expect("region mutex poisoned");
        let previous = inner.locations[index];

        let start_sector = find_or_grow_free_run(&mut inner.free_sectors, sector_count);
        for slot in &mut inner.free_sectors[start_sector..start_sector + sector_count] {
            *slot = false;
        }
        tracing::trace!(
            sector = start_sector,
            count = sector_count,
            chunk_x = column.x(),
            chunk_z = column.z(),
            "allocated sectors for chunk write"
        );

        let persisted = persist_chunk_payload(
            &mut inner,
            index,
            start_sector,
            sector_count,
            payload_len,
            total_bytes,
            &compressed,
        );
        if let Err(e) = persisted {
            // revert the allocation so a failed write doesn't leak sectors;
            // the previous slot's copy (if any) remains untouched and authoritative.
            for slot in &mut inner.free_sectors[start_sector..start_sector + sector_count] {
                *slot = true;
            }
            return Err(e);
        }

        if previous.offset != 0 {
            let start = previous.offset as usize;
            let end = start + previous.sector_count as usize;
            if end <= inner.free_sectors.len() {
                for slot in &mut inner.free_sectors[start..end] {
                    *slot = true;
                }
            }
        }
        drop(inner);

        self.cache
            .insert(index, Arc::new(Mutex::new(column)));
        Ok(())
    }

    /// Writes every cached column back to disk, in cache iteration order.
    pub fn flush_cached_chunks(&self) -> Result<()> {
        let entries: Vec<Arc<Mutex<ChunkColumn>>> =
            self.cache.iter().map(|e| e.value().clone()).collect();
        for entry in entries {
            let column = entry.lock().expect("chunk column mutex poisoned").clone();
            self.write_column(column)?;
        }
        Ok(())
    }

    /// Reads the block state at absolute block coordinates.
    ///
    /// # Errors
    /// Returns [`Error::NotPresent`] if the backing chunk has no data on
    /// disk or in cache.
    pub fn get_block_state(
        &self,
        x: i32,
        y: u16,
        z: i32,
    ) -> Result<crate::palette::BlockState> {
        let chunk_x = block_to_chunk(x);
        let chunk_z = block_to_chunk(z);
        let chunk = self.get_chunk(chunk_x, chunk_z)?.ok_or_else(|| {
            Error::NotPresent(format!("chunk ({chunk_x}, {chunk_z}) is not present"))
        })?;
        let column = chunk.lock().expect("chunk column mutex poisoned");
        column.get_block_state(block_inside_chunk(x) as u8, y, block_inside_chunk(z) as u8)
    }

    /// Writes the block state at absolute block coordinates, creating the
    /// backing chunk (with `data_version`) if it doesn't already exist in
    /// the cache or on disk. Does not itself persist to disk; call
    /// [`Self::write_column`] or [`Self::flush_cached_chunks`] to do so.
    pub fn set_block_state(
        &self,
        x: i32,
        y: u16,
        z: i32,
        state: crate::palette::BlockState,
        data_version: i32,
    ) -> Result<()> {
        let chunk =
            self.get_or_create_chunk(block_to_chunk(x), block_to_chunk(z), data_version)?;
        let mut column = chunk.lock().expect("chunk column mutex poisoned");
        column.set_block_state(
            block_inside_chunk(x) as u8,
            y,
            block_inside_chunk(z) as u8,
            state,
        )
    }

    /// Reads the biome at absolute block coordinates.
    ///
    /// # Errors
    /// Returns [`Error::NotPresent`] if the backing chunk has no data on
    /// disk or in cache.
    pub fn get_biome(&self, x: i32, y: u16, z: i32) -> Result<i32> {
        let chunk_x = block_to_chunk(x);
        let chunk_z = block_to_chunk(z);
        let chunk = self.get_chunk(chunk_x, chunk_z)?.ok_or_else(|| {
            Error::NotPresent(format!("chunk ({chunk_x}, {chunk_z}) is not present"))
        })?;
        let column = chunk.lock().expect("chunk column mutex poisoned");
        column.get_biome(block_inside_chunk(x) as u8, y, block_inside_chunk(z) as u8)
    }

    /// Writes the biome at absolute block coordinates, creating the
    /// backing chunk if necessary. See [`Self::set_block_state`] for the
    /// persistence note.
    pub fn set_biome(
        &self,
        x: i32,
        y: u16,
        z: i32,
        biome: i32,
        data_version: i32,
    ) -> Result<()> {
        let chunk =
            self.get_or_create_chunk(block_to_chunk(x), block_to_chunk(z), data_version)?;
        let mut column = chunk.lock().expect("chunk column mutex poisoned");
        column.set_biome(block_inside_chunk(x) as u8, y, block_inside_chunk(z) as u8, biome)
    }
}

fn read_column_at(file: &mut File, location: ChunkLocation) -> Result<ChunkColumn> {
    file.seek(SeekFrom::Start(location.offset as u64 * SECTOR_SIZE as u64))?;
    let mut len_buf = [0u8; 4];
    file.read_exact(&mut len_buf)?;
    let length = u32::from_be_bytes(len_buf);
    if length == 0 {
        return Err(Error::Malformed("chunk payload declares zero length".to_string()));
    }

    let mut payload = vec![0u8; length as usize];
    file.read_exact(&mut payload)?;
    let compression_type = CompressionType::try_from(payload[0])
        .map_err(|e| Error::Malformed(format!("unknown chunk compression type: {e}")))?;
    let compressed = &payload[1..];

    let mut decompressed = Vec::new();
    match compression_type {
        CompressionType::Gzip => {
            GzDecoder::new(compressed).read_to_end(&mut decompressed)?;
        }
        CompressionType::Zlib => {
            ZlibDecoder::new(compressed).read_to_end(&mut decompressed)?;
        }
        CompressionType::None => decompressed.extend_from_slice(compressed),
    }

    let mut input = &decompressed[..];
    let (_name, tag) = parse_named_tag(&mut input)?;
    ChunkColumn::from_nbt(&tag)
}

/// Writes the length-prefixed, zlib-compressed chunk payload at
/// `start_sector` and persists the header entry for `index`, in the
/// "write, then relink" order spec §4.6 requires.
///
/// On `Err`, the caller is responsible for reverting `free_sectors` —
/// this function only performs the fallible I/O.
#[allow(clippy::too_many_arguments)]
fn persist_chunk_payload(
    inner: &mut Inner,
    index: usize,
    start_sector: usize,
    sector_count: usize,
    payload_len: usize,
    total_bytes: usize,
    compressed: &[u8],
) -> Result<()> {
    inner
        .file
        .seek(SeekFrom::Start(start_sector as u64 * SECTOR_SIZE as u64))?;
    inner.file.write_all(&(payload_len as u32).to_be_bytes())?;
    inner.file.write_all(&[CompressionType::Zlib as u8])?;
    inner.file.write_all(compressed)?;
    let padding = sector_count * SECTOR_SIZE - total_bytes;
    if padding > 0 {
        inner.file.write_all(&vec![0u8; padding])?;
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);

    inner.locations[index] = ChunkLocation {
        offset: start_sector as u32,
        sector_count: sector_count as u8,
    };
    inner.timestamps[index] = timestamp;
    write_header_entry(&mut inner.file, index, inner.locations[index], timestamp)
}

fn write_header_entry(
    file: &mut File,
    index: usize,
    location: ChunkLocation,
    timestamp: u32,
) -> Result<()> {
    let mut loc_bytes = [0u8; 4];
    loc_bytes[0] = ((location.offset >> 16) & 0xFF) as u8;
    loc_bytes[1] = ((location.offset >> 8) & 0xFF) as u8;
    loc_bytes[2] = (location.offset & 0xFF) as u8;
    loc_bytes[3] = location.sector_count;
    file.seek(SeekFrom::Start(index as u64 * 4))?;
    file.write_all(&loc_bytes)?;

    file.seek(SeekFrom::Start(SECTOR_SIZE as u64 + index as u64 * 4))?;
    file.write_all(&timestamp.to_be_bytes())?;
    Ok(())
}

/// Finds the first run of `count` consecutive free sectors, growing
/// `free_sectors` (appending new, initially-taken slots) if none fits.
///
/// Uses the corrected inclusive bound `0..=len - count` so a run ending
/// exactly at the current tail is found instead of skipped.
fn find_or_grow_free_run(free_sectors: &mut Vec<bool>, count: usize) -> usize {
    if count <= free_sectors.len() {
        for start in 0..=(free_sectors.len() - count) {
            if free_sectors[start..start + count].iter().all(|&free| free) {
                return start;
            }
        }
    }
    let start = free_sectors.len();
    free_sectors.resize(start + count, false);
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_helpers_match_spec_shifts() {
        assert_eq!(block_to_chunk(17), 1);
        assert_eq!(block_to_chunk(-1), -1);
        assert_eq!(chunk_to_region(32), 1);
        assert_eq!(chunk_to_region(-1), -1);
        assert_eq!(chunk_inside_region(33), 1);
        assert_eq!(chunk_inside_region(-1), 31);
        assert_eq!(block_inside_chunk(17), 1);
        assert_eq!(block_inside_chunk(-1), 15);
    }

    #[test]
    fn find_or_grow_free_run_uses_corrected_inclusive_bound() {
        let mut sectors = vec![false, false, true, true];
        // a run of 2 fits exactly at the tail (indices 2..4); the naive
        // exclusive bound 0..(len-count) = 0..2 would miss it.
        assert_eq!(find_or_grow_free_run(&mut sectors, 2), 2);
    }

    #[test]
    fn find_or_grow_free_run_appends_when_nothing_fits() {
        let mut sectors = vec![false, false];
        let start = find_or_grow_free_run(&mut sectors, 3);
        assert_eq!(start, 2);
        assert_eq!(sectors.len(), 5);
    }

    #[test]
    fn write_then_read_round_trips_a_chunk() {
        let dir = std::env::temp_dir().join(format!(
            "anvil-nbt-test-{}-{}",
            std::process::id(),
            "write_then_read_round_trips_a_chunk"
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("r.0.0.mca");
        let _ = std::fs::remove_file(&path);

        let region = RegionFile::open(&path, 0, 0).unwrap();
        let mut column = ChunkColumn::new(3, 5, 3465);
        column
            .set_block_state(0, 64, 0, crate::palette::BlockState::new("minecraft:stone"))
            .unwrap();
        region.write_column(column).unwrap();
        region.forget(3, 5).unwrap(); // force the next get_chunk to read from disk

        let loaded = region.get_chunk(3, 5).unwrap().expect("chunk present");
        let loaded = loaded.lock().unwrap();
        assert_eq!(
            loaded.get_block_state(0, 64, 0).unwrap().name,
            "minecraft:stone"
        );

        assert!(region.has_chunk(3, 5).unwrap());
        assert!(!region.has_chunk(4, 5).unwrap());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn oversized_column_fails_with_capacity_and_keeps_prior_readable() {
        let dir = std::env::temp_dir().join(format!(
            "anvil-nbt-test-{}-{}",
            std::process::id(),
            "oversized_column_fails_with_capacity"
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("r.0.0.mca");
        let _ = std::fs::remove_file(&path);

        let region = RegionFile::open(&path, 0, 0).unwrap();
        let mut good = ChunkColumn::new(1, 1, 3465);
        good.set_block_state(0, 0, 0, crate::palette::BlockState::new("minecraft:stone"))
            .unwrap();
        region.write_column(good).unwrap();

        let mut huge = ChunkColumn::new(1, 1, 3465);
        // a fresh, distinct block state per slot defeats palette
        // compression and inflates the section's packed long array well
        // past the 1 MiB/chunk cap.
        for y in 0..256u16 {
            for x in 0..16u8 {
                for z in 0..16u8 {
                    let name = format!("minecraft:unique_block_{y}_{x}_{z}");
                    huge.set_block_state(x, y, z, crate::palette::BlockState::new(name))
                        .unwrap();
                }
            }
        }
        let err = region.write_column(huge);
        assert!(matches!(err, Err(Error::Capacity(_))));

        let still_present = region.get_chunk(1, 1).unwrap().expect("chunk present");
        assert_eq!(
            still_present.lock().unwrap().get_block_state(0, 0, 0).unwrap().name,
            "minecraft:stone"
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn live_chunk_sector_ranges_never_overlap() {
        // spec §8 "Region allocator" universal property: after any sequence
        // of writes, no two live chunk slots' sector ranges overlap.
        let dir = std::env::temp_dir().join(format!(
            "anvil-nbt-test-{}-{}",
            std::process::id(),
            "live_chunk_sector_ranges_never_overlap"
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("r.0.0.mca");
        let _ = std::fs::remove_file(&path);

        let region = RegionFile::open(&path, 0, 0).unwrap();
        for i in 0..20 {
            let cx = i % 5;
            let cz = i / 5;
            let mut column = ChunkColumn::new(cx, cz, 3465);
            // varying payload sizes so sector counts differ across slots.
            let filler: Vec<u8> = vec![(i * 7) as u8; 100 * (i as usize + 1)];
            column.set_extra("Filler", crate::nbt::NbtTag::ByteArray(filler));
            column
                .set_block_state(0, 0, 0, crate::palette::BlockState::new("minecraft:stone"))
                .unwrap();
            region.write_column(column).unwrap();
        }

        let inner = region.inner.lock().unwrap();
        let live: Vec<(usize, usize)> = inner
            .locations
            .iter()
            .filter(|loc| loc.offset != 0)
            .map(|loc| {
                let start = loc.offset as usize;
                (start, start + loc.sector_count as usize)
            })
            .collect();

        assert!(live.len() >= 20);
        for i in 0..live.len() {
            for j in (i + 1)..live.len() {
                let (a_start, a_end) = live[i];
                let (b_start, b_end) = live[j];
                assert!(
                    a_end <= b_start || b_end <= a_start,
                    "sector ranges [{a_start}, {a_end}) and [{b_start}, {b_end}) overlap"
                );
            }
        }
        drop(inner);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn get_block_state_and_biome_fail_not_present_for_absent_chunk() {
        let dir = std::env::temp_dir().join(format!(
            "anvil-nbt-test-{}-{}",
            std::process::id(),
            "get_block_state_not_present"
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("r.0.0.mca");
        let _ = std::fs::remove_file(&path);

        let region = RegionFile::open(&path, 0, 0).unwrap();
        assert!(matches!(
            region.get_block_state(0, 0, 0),
            Err(Error::NotPresent(_))
        ));
        assert!(matches!(
            region.get_biome(0, 0, 0),
            Err(Error::NotPresent(_))
        ));

        let _ = std::fs::remove_file(&path);
    }
}
