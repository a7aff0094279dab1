// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

//! Block states and the per-section palette that maps them to compact ids.

use crate::bits::{bits_for_palette_size, pack};
use crate::error::{Error, Result};
use crate::nbt::NbtTag;
use indexmap::IndexMap;

/// An interned `(name, properties)` tuple identifying a block's visual/logical state.
///
/// Two block states are equal iff both the name and every property match
/// exactly; `properties` participates in `Eq` via `IndexMap`'s own
/// equality, which compares keys and values irrespective of insertion
/// order. `IndexMap` itself has no `Hash` impl (consistent with its
/// order-independent `Eq`, the same reason `std::collections::HashMap`
/// has none), so `Hash` below is implemented by hand over a key-sorted
/// view of `properties` to stay consistent with that order-independent
/// equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    pub name: String,
    pub properties: IndexMap<String, String>,
}

impl std::hash::Hash for BlockState {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        let mut props: Vec<(&String, &String)> = self.properties.iter().collect();
        props.sort_unstable_by(|a, b| a.0.cmp(b.0));
        props.len().hash(state);
        for (k, v) in props {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl BlockState {
    /// A block state with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// The implicit air state every section slot defaults to.
    pub fn air() -> Self {
        Self::new("minecraft:air")
    }

    /// Adds a property, builder-style.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Serializes this state as a Compound with `Name` and, if non-empty, `Properties`.
    pub fn to_nbt(&self) -> NbtTag {
        let mut map = IndexMap::new();
        map.insert("Name".to_string(), NbtTag::String(self.name.clone()));
        if !self.properties.is_empty() {
            let mut props = IndexMap::new();
            for (k, v) in &self.properties {
                props.insert(k.clone(), NbtTag::String(v.clone()));
            }
            map.insert("Properties".to_string(), NbtTag::Compound(props));
        }
        NbtTag::Compound(map)
    }

    /// Parses a state from a Compound with `Name` and optional `Properties`.
    pub fn from_nbt(tag: &NbtTag) -> Result<Self> {
        let map = tag
            .as_compound()
            .ok_or_else(|| Error::Malformed("block state is not a compound".to_string()))?;
        let name = map
            .get("Name")
            .and_then(NbtTag::as_str)
            .ok_or_else(|| Error::Malformed("block state missing Name".to_string()))?
            .to_string();
        let mut properties = IndexMap::new();
        if let Some(props) = map.get("Properties") {
            let props = props
                .as_compound()
                .ok_or_else(|| Error::Malformed("Properties is not a compound".to_string()))?;
            for (k, v) in props {
                let v = v.as_str().ok_or_else(|| {
                    Error::Malformed(format!("property {k} is not a string"))
                })?;
                properties.insert(k.clone(), v.to_string());
            }
        }
        Ok(Self { name, properties })
    }
}

/// A section-local set of distinct block states, giving each one a compact
/// integer id equal to its position in the palette.
///
/// Iteration order is insertion order of first introduction; removing a
/// state (when its refcount drops to zero) shifts the ids of every state
/// after it, so callers must re-encode any packed block array that
/// referenced ids above the removed one.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    states: Vec<BlockState>,
    refcounts: IndexMap<BlockState, u32>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct states currently in the palette.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The state at `id`, if any.
    pub fn get(&self, id: u32) -> Option<&BlockState> {
        self.states.get(id as usize)
    }

    /// The id of `state`, if it is present in the palette.
    pub fn id_of(&self, state: &BlockState) -> Option<u32> {
        self.states.iter().position(|s| s == state).map(|i| i as u32)
    }

    /// Iterates states in palette (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockState> {
        self.states.iter()
    }

    /// Adds `state` if new (refcount 1) or increments its refcount.
    /// Returns the state's id.
    pub fn increase(&mut self, state: BlockState) -> u32 {
        if let Some(count) = self.refcounts.get_mut(&state) {
            *count += 1;
            self.id_of(&state).expect("state tracked in refcounts but missing from states")
        } else {
            let id = self.states.len() as u32;
            self.refcounts.insert(state.clone(), 1);
            self.states.push(state);
            id
        }
    }

    /// Decrements `state`'s refcount, removing it (and shifting subsequent
    /// ids down by one) when the count reaches zero.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `state` has no outstanding
    /// references.
    pub fn decrease(&mut self, state: &BlockState) -> Result<()> {
        let count = self.refcounts.get_mut(state).ok_or_else(|| {
            Error::InvalidArgument(format!("no references to decrement for {}", state.name))
        })?;
        *count -= 1;
        if *count == 0 {
            self.refcounts.shift_remove(state);
            let idx = self
                .states
                .iter()
                .position(|s| s == state)
                .expect("state tracked in states but missing refcount entry");
            self.states.remove(idx);
        }
        Ok(())
    }

    /// Increments refcounts for an already-populated palette without
    /// mutating its order, given a set of states to attribute references
    /// to (e.g. the decoded contents of a `BlockStates` long array).
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if any state is not already in
    /// the palette.
    pub fn load_references(&mut self, states: &[BlockState]) -> Result<()> {
        for state in states {
            let count = self.refcounts.get_mut(state).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "load_references: {} is not in the palette",
                    state.name
                ))
            })?;
            *count += 1;
        }
        Ok(())
    }

    /// Encodes `ids` (one per block slot) into a packed long array using
    /// `bit_length = ceil(log2(palette_size))`, clamped to `>= 1`.
    pub fn compact_ids(&self, ids: &[u32]) -> Vec<i64> {
        let bit_length = self.bit_length();
        let values: Vec<u64> = ids.iter().map(|&id| id as u64).collect();
        pack(&values, bit_length)
            .into_iter()
            .map(|w| w as i64)
            .collect()
    }

    /// The bit width this palette's `compact_ids` output uses:
    /// `ceil(log2(palette size))`, clamped to `>= 1`. Callers that need the
    /// game's section-writer clamp (`max(4, ...)`) apply it themselves —
    /// see [`crate::chunk::ChunkSection`], which is the only caller that
    /// needs it.
    pub fn bit_length(&self) -> u32 {
        bits_for_palette_size(self.len())
    }

    /// Serializes as a `List<Compound>` in palette order.
    pub fn to_nbt(&self) -> NbtTag {
        NbtTag::List(self.states.iter().map(BlockState::to_nbt).collect())
    }

    /// Loads a palette from a `List<Compound>`; ids are assigned by list position.
    pub fn from_nbt(tag: &NbtTag) -> Result<Self> {
        let items = tag
            .as_list()
            .ok_or_else(|| Error::Malformed("Palette is not a list".to_string()))?;
        let mut palette = Palette::new();
        for item in items {
            let state = BlockState::from_nbt(item)?;
            palette.increase(state);
        }
        Ok(palette)
    }
}
