// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

//! A full vertical chunk (16 sections, heightmaps, entities, and whatever
//! else the level format carries) at an absolute (x, z) chunk coordinate.

use crate::chunk::section::ChunkSection;
use crate::error::{Error, Result};
use crate::nbt::NbtTag;
use crate::palette::BlockState;
use indexmap::IndexMap;

const SECTIONS_PER_COLUMN: usize = 16;

/// One chunk (16x256x16 blocks) worth of world data.
///
/// Sections are stored sparse: a y-index with no section present is
/// treated as entirely air on read, and a section is only materialized
/// the first time a `set` touches it. Any NBT tag under `Level` that this
/// type doesn't interpret (heightmaps, entities, tile entities,
/// structures, inhabited time, last update, status, ...) is kept verbatim
/// and re-emitted on `to_nbt`.
#[derive(Debug, Clone)]
pub struct ChunkColumn {
    x: i32,
    z: i32,
    data_version: i32,
    sections: [Option<ChunkSection>; SECTIONS_PER_COLUMN],
    /// Every other field under `Level`, preserved in insertion order.
    extra: IndexMap<String, NbtTag>,
}

impl ChunkColumn {
    /// Creates an empty column (no sections, no extra metadata) at the
    /// given absolute chunk coordinates.
    pub fn new(x: i32, z: i32, data_version: i32) -> Self {
        Self {
            x,
            z,
            data_version,
            sections: std::array::from_fn(|_| None),
            extra: IndexMap::new(),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn data_version(&self) -> i32 {
        self.data_version
    }

    pub fn section(&self, y_index: usize) -> Option<&ChunkSection> {
        self.sections.get(y_index).and_then(|s| s.as_ref())
    }

    /// Any preserved metadata tag under `Level` this type doesn't
    /// otherwise interpret (e.g. `Heightmaps`, `TileEntities`, `Status`).
    pub fn extra(&self, key: &str) -> Option<&NbtTag> {
        self.extra.get(key)
    }

    /// Sets (or replaces) a preserved metadata tag under `Level`.
    pub fn set_extra(&mut self, key: impl Into<String>, value: NbtTag) {
        self.extra.insert(key.into(), value);
    }

    /// Reads the block state at chunk-local coordinates (`x`, `z` in
    /// `0..16`, `y` in `0..256`). A y-index with no materialized section
    /// reads as air.
    pub fn get_block_state(&self, x: u8, y: u16, z: u8) -> Result<BlockState> {
        let (section_idx, local_y) = split_y(y)?;
        match self.section(section_idx) {
            Some(section) => Ok(section.get(x, local_y, z)?.clone()),
            None => Ok(BlockState::air()),
        }
    }

    /// Writes the block state at chunk-local coordinates. Materializes
    /// the containing section on first write if it didn't already exist.
    pub fn set_block_state(&mut self, x: u8, y: u16, z: u8, state: BlockState) -> Result<()> {
        let (section_idx, local_y) = split_y(y)?;
        let section = self.sections[section_idx]
            .get_or_insert_with(|| ChunkSection::new(section_idx as i8));
        section.set(x, local_y, z, state)
    }

    /// Reads the biome at chunk-local block coordinates, via the
    /// containing section's 4x4x4 biome grid. A y-index with no
    /// materialized section reads as biome id 0.
    pub fn get_biome(&self, x: u8, y: u16, z: u8) -> Result<i32> {
        let (section_idx, local_y) = split_y(y)?;
        match self.section(section_idx) {
            Some(section) => section.get_biome_at_block(x, local_y, z),
            None => Ok(0),
        }
    }

    /// Writes the biome at chunk-local block coordinates. Materializes
    /// the containing section on first write if it didn't already exist.
    pub fn set_biome(&mut self, x: u8, y: u16, z: u8, biome: i32) -> Result<()> {
        let (section_idx, local_y) = split_y(y)?;
        let section = self.sections[section_idx]
            .get_or_insert_with(|| ChunkSection::new(section_idx as i8));
        section.set_biome(x >> 2, local_y >> 2, z >> 2, biome)
    }

    /// Serializes to the root Compound described in spec §4.5: `Level`
    /// (holding `xPos`, `zPos`, `Sections`, and every preserved tag) plus
    /// a sibling `DataVersion`.
    ///
    /// Sections that are entirely implicit air are dropped from
    /// `Sections` rather than written out as an all-air entry.
    pub fn to_nbt(&self) -> NbtTag {
        let mut level = IndexMap::new();
        level.insert("xPos".to_string(), NbtTag::Int(self.x));
        level.insert("zPos".to_string(), NbtTag::Int(self.z));

        let sections: Vec<NbtTag> = self
            .sections
            .iter()
            .filter_map(|s| s.as_ref())
            .filter(|s| !s.is_empty())
            .map(ChunkSection::to_nbt)
            .collect();
        level.insert("Sections".to_string(), NbtTag::List(sections));

        for (key, value) in &self.extra {
            level.insert(key.clone(), value.clone());
        }

        let mut root = IndexMap::new();
        root.insert("Level".to_string(), NbtTag::Compound(level));
        root.insert("DataVersion".to_string(), NbtTag::Int(self.data_version));
        NbtTag::Compound(root)
    }

    /// Parses a root Compound as described in spec §4.5. Any tag under
    /// `Level` other than `xPos`/`zPos`/`Sections` is retained verbatim
    /// for re-emission.
    pub fn from_nbt(tag: &NbtTag) -> Result<Self> {
        let root = tag
            .as_compound()
            .ok_or_else(|| Error::Malformed("chunk column is not a compound".to_string()))?;

        let data_version = root
            .get("DataVersion")
            .and_then(NbtTag::as_i32)
            .ok_or_else(|| Error::Malformed("chunk column missing DataVersion".to_string()))?;

        let level = root
            .get("Level")
            .and_then(NbtTag::as_compound)
            .ok_or_else(|| Error::Malformed("chunk column missing Level".to_string()))?;

        let x = level
            .get("xPos")
            .and_then(NbtTag::as_i32)
            .ok_or_else(|| Error::Malformed("chunk column missing xPos".to_string()))?;
        let z = level
            .get("zPos")
            .and_then(NbtTag::as_i32)
            .ok_or_else(|| Error::Malformed("chunk column missing zPos".to_string()))?;

        let mut sections: [Option<ChunkSection>; SECTIONS_PER_COLUMN] =
            std::array::from_fn(|_| None);
        if let Some(list) = level.get("Sections").and_then(NbtTag::as_list) {
            for item in list {
                let section = ChunkSection::from_nbt(item)?;
                let idx = section.y() as usize;
                if idx >= SECTIONS_PER_COLUMN {
                    return Err(Error::OutOfRange(format!(
                        "section y-index {} outside 0..{SECTIONS_PER_COLUMN}",
                        section.y()
                    )));
                }
                sections[idx] = Some(section);
            }
        }

        let mut extra = IndexMap::new();
        for (key, value) in level {
            if matches!(key.as_str(), "xPos" | "zPos" | "Sections") {
                continue;
            }
            extra.insert(key.clone(), value.clone());
        }

        Ok(Self {
            x,
            z,
            data_version,
            sections,
            extra,
        })
    }
}

/// Splits an absolute y (`0..256`) into a section index (`0..16`) and a
/// section-local y (`0..16`).
fn split_y(y: u16) -> Result<(usize, u8)> {
    if y >= 256 {
        return Err(Error::OutOfRange(format!("y {y} outside 0..256")));
    }
    Ok(((y / 16) as usize, (y % 16) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_column_reads_as_air_everywhere() {
        let column = ChunkColumn::new(3, -5, 3465);
        assert_eq!(column.get_block_state(0, 0, 0).unwrap().name, "minecraft:air");
        assert_eq!(column.get_block_state(15, 255, 15).unwrap().name, "minecraft:air");
        assert_eq!(column.get_biome(0, 0, 0).unwrap(), 0);
    }

    #[test]
    fn set_materializes_section_on_demand() {
        let mut column = ChunkColumn::new(0, 0, 3465);
        assert!(column.section(4).is_none());
        column
            .set_block_state(1, 68, 2, BlockState::new("minecraft:stone"))
            .unwrap();
        assert!(column.section(4).is_some());
        assert_eq!(
            column.get_block_state(1, 68, 2).unwrap().name,
            "minecraft:stone"
        );
    }

    #[test]
    fn y_out_of_range_rejected() {
        let column = ChunkColumn::new(0, 0, 3465);
        assert!(matches!(column.get_block_state(0, 256, 0), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn nbt_round_trip_preserves_extra_metadata_and_drops_empty_sections() {
        let mut column = ChunkColumn::new(7, -2, 3465);
        column.set_extra("Status", NbtTag::String("full".to_string()));
        column
            .set_block_state(0, 64, 0, BlockState::new("minecraft:stone"))
            .unwrap();
        // materialize a second section but leave it all-air
        column.set_block_state(0, 80, 0, BlockState::air()).unwrap();

        let nbt = column.to_nbt();
        let loaded = ChunkColumn::from_nbt(&nbt).unwrap();

        assert_eq!(loaded.x(), 7);
        assert_eq!(loaded.z(), -2);
        assert_eq!(loaded.data_version(), 3465);
        assert_eq!(
            loaded.extra("Status"),
            Some(&NbtTag::String("full".to_string()))
        );
        assert_eq!(
            loaded.get_block_state(0, 64, 0).unwrap().name,
            "minecraft:stone"
        );
        // the section at y-index 5 was all-air and should not round-trip as present
        assert!(loaded.section(5).is_none());
    }

    #[test]
    fn missing_data_version_is_malformed() {
        let mut root = IndexMap::new();
        root.insert("Level".to_string(), NbtTag::Compound(IndexMap::new()));
        let err = ChunkColumn::from_nbt(&NbtTag::Compound(root));
        assert!(matches!(err, Err(Error::Malformed(_))));
    }
}
