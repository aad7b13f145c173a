//! Ordered, de-duplicated record of world edits.
#![forbid(unsafe_code)]

use voxgate_geom::BlockPos;
use voxgate_world::ChunkCoord;

/// Whether an edit adds or removes a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditDelta {
    Add,
    Remove,
}

impl EditDelta {
    /// `+1` for additions, `-1` for removals.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            EditDelta::Add => 1,
            EditDelta::Remove => -1,
        }
    }

    #[inline]
    pub fn is_remove(self) -> bool {
        matches!(self, EditDelta::Remove)
    }
}

/// What an added cell is rendered as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    #[default]
    Terrain,
    Portal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Modification {
    pub pos: BlockPos,
    pub delta: EditDelta,
    pub kind: CellKind,
}

impl Modification {
    pub fn new(pos: BlockPos, delta: EditDelta, kind: CellKind) -> Self {
        Self { pos, delta, kind }
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct ModificationLogStats {
    pub entries: usize,
    pub adds: usize,
    pub removes: usize,
    pub replaced: u64,
}

/// Current intended state per edited coordinate, in recording order.
///
/// Holds at most one entry per position; re-recording a position drops the
/// old entry and appends the new one.
#[derive(Default, Debug, Clone)]
pub struct ModificationLog {
    entries: Vec<Modification>,
    replaced: u64,
}

impl ModificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pos: BlockPos, delta: EditDelta, kind: CellKind) {
        if let Some(i) = self.entries.iter().position(|m| m.pos == pos) {
            self.entries.remove(i);
            self.replaced += 1;
        }
        self.entries.push(Modification::new(pos, delta, kind));
    }

    /// Latest entry at `pos`, if any.
    pub fn get(&self, pos: BlockPos) -> Option<&Modification> {
        self.entries.iter().find(|m| m.pos == pos)
    }

    /// Entries whose column lies inside `coord`'s footprint, in log order.
    pub fn for_chunk(&self, coord: ChunkCoord, size: usize) -> Vec<Modification> {
        self.entries
            .iter()
            .filter(|m| coord.contains_column(m.pos.x, m.pos.z, size))
            .copied()
            .collect()
    }

    #[inline]
    pub fn entries(&self) -> &[Modification] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> ModificationLogStats {
        let removes = self.entries.iter().filter(|m| m.delta.is_remove()).count();
        ModificationLogStats {
            entries: self.entries.len(),
            adds: self.entries.len() - removes,
            removes,
            replaced: self.replaced,
        }
    }
}
