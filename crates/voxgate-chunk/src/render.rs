//! Flat `(x, y, z, flag)` instance buffer published to the renderer.

use hashbrown::HashMap;
use voxgate_geom::BlockPos;

/// Per-instance flag stored in the fourth float of each entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellFlag {
    Terrain = 0,
    Portal = 1,
    Highlight = 2,
    PortalHighlight = 4,
}

impl CellFlag {
    #[inline]
    pub fn as_f32(self) -> f32 {
        self as u8 as f32
    }
}

/// Instance buffer plus a position index for O(1) flag updates and removal.
/// Removal moves the last entry into the freed slot.
#[derive(Clone, Debug, Default)]
pub struct RenderBuffer {
    data: Vec<f32>,
    positions: Vec<BlockPos>,
    flags: Vec<CellFlag>,
    index: HashMap<BlockPos, usize>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cubes to draw.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `4 × len` floats.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.index.contains_key(&pos)
    }

    #[inline]
    pub fn flag(&self, pos: BlockPos) -> Option<CellFlag> {
        self.index.get(&pos).map(|&slot| self.flags[slot])
    }

    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.positions.iter().copied()
    }

    /// Append `pos`; returns false if it is already drawn.
    pub fn insert(&mut self, pos: BlockPos, flag: CellFlag) -> bool {
        if self.index.contains_key(&pos) {
            return false;
        }
        self.index.insert(pos, self.positions.len());
        self.positions.push(pos);
        self.flags.push(flag);
        self.data
            .extend_from_slice(&[pos.x as f32, pos.y as f32, pos.z as f32, flag.as_f32()]);
        true
    }

    pub fn remove(&mut self, pos: BlockPos) -> bool {
        let Some(slot) = self.index.remove(&pos) else {
            return false;
        };
        let last = self.positions.len() - 1;
        self.positions.swap_remove(slot);
        self.flags.swap_remove(slot);
        if slot != last {
            let (head, tail) = self.data.split_at_mut(last * 4);
            head[slot * 4..slot * 4 + 4].copy_from_slice(&tail[..4]);
            self.index.insert(self.positions[slot], slot);
        }
        self.data.truncate(last * 4);
        true
    }

    pub fn set_flag(&mut self, pos: BlockPos, flag: CellFlag) -> bool {
        let Some(&slot) = self.index.get(&pos) else {
            return false;
        };
        self.flags[slot] = flag;
        self.data[slot * 4 + 3] = flag.as_f32();
        true
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.positions.clear();
        self.flags.clear();
        self.index.clear();
    }
}
