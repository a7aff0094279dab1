// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

//! A single 16x16x16 vertical slice of a chunk column.

use crate::bits::{bits_for_palette_size, pack, unpack};
use crate::error::{Error, Result};
use crate::nbt::NbtTag;
use crate::palette::{BlockState, Palette};
use indexmap::IndexMap;

const BLOCKS_PER_SECTION: usize = 4096; // 16 * 16 * 16
const BIOMES_PER_SECTION: usize = 64; // 4 * 4 * 4

/// One of the (up to) 16 vertical slices making up a [`super::ChunkColumn`].
#[derive(Debug, Clone)]
pub struct ChunkSection {
    y: i8,
    palette: Palette,
    /// Palette id for every block slot, indexed `y*256 + z*16 + x`.
    blocks: Vec<u32>,
    /// Raw biome id for every 4x4x4 sub-cell, indexed `by*16 + bz*4 + bx`.
    biomes: Vec<i32>,
}

#[inline]
fn block_index(x: u8, y: u8, z: u8) -> usize {
    debug_assert!(x < 16 && y < 16 && z < 16);
    y as usize * 256 + z as usize * 16 + x as usize
}

#[inline]
fn biome_index(bx: u8, by: u8, bz: u8) -> usize {
    debug_assert!(bx < 4 && by < 4 && bz < 4);
    by as usize * 16 + bz as usize * 4 + bx as usize
}

impl ChunkSection {
    /// Creates an empty section (all slots implicit air) at vertical index `y`.
    pub fn new(y: i8) -> Self {
        let mut palette = Palette::new();
        palette.increase(BlockState::air());
        Self {
            y,
            palette,
            blocks: vec![0; BLOCKS_PER_SECTION],
            biomes: vec![0; BIOMES_PER_SECTION],
        }
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// `true` if every block slot is air and the palette holds only air.
    pub fn is_empty(&self) -> bool {
        self.palette.len() <= 1
            && self
                .palette
                .get(0)
                .map(|s| s.name == "minecraft:air")
                .unwrap_or(true)
    }

    /// Reads the block state at section-local coordinates (each `0..16`).
    pub fn get(&self, x: u8, y: u8, z: u8) -> Result<&BlockState> {
        check_block_coord(x, y, z)?;
        let id = self.blocks[block_index(x, y, z)];
        Ok(self
            .palette
            .get(id)
            .expect("block slot referenced an id not present in the section's palette"))
    }

    /// Writes the block state at section-local coordinates (each `0..16`).
    ///
    /// Decrements the palette refcount of the outgoing state and
    /// increments (or inserts) the new one, renumbering `blocks` if the
    /// outgoing state's removal shifted any ids down.
    pub fn set(&mut self, x: u8, y: u8, z: u8, state: BlockState) -> Result<()> {
        check_block_coord(x, y, z)?;
        let idx = block_index(x, y, z);
        let old_id = self.blocks[idx];
        let old_state = self
            .palette
            .get(old_id)
            .expect("block slot referenced an id not present in the section's palette")
            .clone();
        if old_state == state {
            return Ok(());
        }

        self.palette.decrease(&old_state)?;
        let removed = self.palette.id_of(&old_state).is_none();
        if removed {
            for slot in self.blocks.iter_mut() {
                if *slot > old_id {
                    *slot -= 1;
                }
            }
        }
        let new_id = self.palette.increase(state);
        self.blocks[idx] = new_id;
        Ok(())
    }

    /// Reads the biome at section-local 4x4x4 coordinates (each `0..4`).
    pub fn get_biome(&self, bx: u8, by: u8, bz: u8) -> Result<i32> {
        check_biome_coord(bx, by, bz)?;
        Ok(self.biomes[biome_index(bx, by, bz)])
    }

    /// Writes the biome at section-local 4x4x4 coordinates (each `0..4`).
    pub fn set_biome(&mut self, bx: u8, by: u8, bz: u8, biome: i32) -> Result<()> {
        check_biome_coord(bx, by, bz)?;
        self.biomes[biome_index(bx, by, bz)] = biome;
        Ok(())
    }

    /// Maps full block-local coordinates to the containing 4x4x4 biome
    /// cell, via truncating division (`>> 2`).
    pub fn get_biome_at_block(&self, x: u8, y: u8, z: u8) -> Result<i32> {
        check_block_coord(x, y, z)?;
        self.get_biome(x >> 2, y >> 2, z >> 2)
    }

    /// Serializes to the section Compound described in spec §4.4.
    pub fn to_nbt(&self) -> NbtTag {
        let mut map = IndexMap::new();
        map.insert("Y".to_string(), NbtTag::Byte(self.y));
        map.insert("Palette".to_string(), self.palette.to_nbt());

        if self.palette.len() > 1 {
            // spec §4.4's clamp: matches the game's section writer, not
            // the plain palette-compaction width spec §4.3 defines.
            let bit_length = self.palette.bit_length().max(4);
            let values: Vec<u64> = self.blocks.iter().map(|&id| id as u64).collect();
            let words = pack(&values, bit_length);
            map.insert(
                "BlockStates".to_string(),
                NbtTag::LongArray(words.into_iter().map(|w| w as i64).collect()),
            );
        }

        if self.biomes.iter().any(|&b| b != 0) {
            map.insert(
                "BiomeArray".to_string(),
                NbtTag::IntArray(self.biomes.clone()),
            );
        }

        NbtTag::Compound(map)
    }

    /// Parses a section Compound as described in spec §4.4.
    pub fn from_nbt(tag: &NbtTag) -> Result<Self> {
        let map = tag
            .as_compound()
            .ok_or_else(|| Error::Malformed("chunk section is not a compound".to_string()))?;

        let y = map
            .get("Y")
            .and_then(NbtTag::as_byte)
            .ok_or_else(|| Error::Malformed("chunk section missing Y".to_string()))?;

        let palette_tag = map
            .get("Palette")
            .ok_or_else(|| Error::Malformed("chunk section missing Palette".to_string()))?;
        let palette = Palette::from_nbt(palette_tag)?;

        let blocks = if palette.len() <= 1 {
            vec![0u32; BLOCKS_PER_SECTION]
        } else {
            let bit_length = bits_for_palette_size(palette.len()).max(4);
            let words: Vec<u64> = map
                .get("BlockStates")
                .and_then(NbtTag::as_long_array)
                .ok_or_else(|| {
                    Error::Malformed("chunk section missing BlockStates for multi-entry palette".to_string())
                })?
                .iter()
                .map(|&w| w as u64)
                .collect();
            unpack(&words, bit_length, BLOCKS_PER_SECTION)
                .into_iter()
                .map(|v| v as u32)
                .collect()
        };

        let biomes = map
            .get("BiomeArray")
            .and_then(NbtTag::as_int_array)
            .map(|a| a.to_vec())
            .unwrap_or_else(|| vec![0; BIOMES_PER_SECTION]);

        Ok(Self {
            y,
            palette,
            blocks,
            biomes,
        })
    }
}

fn check_block_coord(x: u8, y: u8, z: u8) -> Result<()> {
    if x >= 16 || y >= 16 || z >= 16 {
        return Err(Error::OutOfRange(format!(
            "block coordinate ({x},{y},{z}) outside 0..16"
        )));
    }
    Ok(())
}

fn check_biome_coord(bx: u8, by: u8, bz: u8) -> Result<()> {
    if bx >= 4 || by >= 4 || bz >= 4 {
        return Err(Error::OutOfRange(format!(
            "biome coordinate ({bx},{by},{bz}) outside 0..4"
        )));
    }
    Ok(())
}
