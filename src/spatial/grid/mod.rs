//! Grid - sparse map of chunks plus the global tick and phase bit

use std::collections::HashMap;

use log::info;

use super::{Chunk, ChunkCoord};

mod access;

pub struct Grid {
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Every chunk coordinate, sorted by row-major key. Iteration never depends on hash order.
    order: Vec<ChunkCoord>,
    tick: u64,
    phase: bool,
    dirty_border: i32,
    ambient_temp: f32,
}

impl Grid {
    pub fn new(dirty_border: i32, ambient_temp: f32) -> Self {
        Self {
            chunks: HashMap::new(),
            order: Vec::new(),
            tick: 0,
            phase: false,
            dirty_border: dirty_border.max(1),
            ambient_temp,
        }
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Phase bit of the current (or most recent) tick
    #[inline]
    pub fn phase(&self) -> bool {
        self.phase
    }

    pub(crate) fn flip_phase(&mut self) -> bool {
        self.phase = !self.phase;
        self.phase
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    #[inline]
    pub fn dirty_border(&self) -> i32 {
        self.dirty_border
    }

    #[inline]
    pub fn ambient_temp(&self) -> f32 {
        self.ambient_temp
    }

    pub fn set_ambient_temp(&mut self, temp: f32) {
        self.ambient_temp = temp;
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk coordinates in scan order (rows top to bottom, left to right)
    pub fn chunk_coords(&self) -> &[ChunkCoord] {
        &self.order
    }

    #[inline]
    pub fn has_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Fetch a chunk, creating an empty one on first touch.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let Self { chunks, order, ambient_temp, phase, .. } = self;
        chunks.entry(coord).or_insert_with(|| {
            let key = coord.row_major_key();
            let at = order.partition_point(|c| c.row_major_key() < key);
            order.insert(at, coord);
            Chunk::new(coord, *ambient_temp, *phase)
        })
    }

    /// Insert or replace a chunk, returning the previous one.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Option<Chunk> {
        let coord = chunk.coord();
        let previous = self.chunks.insert(coord, chunk);
        if previous.is_none() {
            let key = coord.row_major_key();
            let at = self.order.partition_point(|c| c.row_major_key() < key);
            self.order.insert(at, coord);
        }
        previous
    }

    /// Drop every chunk and rewind the clock. Collider handles must be released by the caller
    /// first (see `chunks()`).
    pub fn clear(&mut self) {
        info!("grid cleared ({} chunks)", self.chunks.len());
        self.chunks.clear();
        self.order.clear();
        self.tick = 0;
        self.phase = false;
    }

    /// Chunks in scan order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.order.iter().filter_map(move |c| self.chunks.get(c))
    }
}
