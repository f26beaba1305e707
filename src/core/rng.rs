use crate::spatial::ChunkCoord;

/// Xorshift32 random number generator
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic generator for one chunk during one tick.
///
/// Built fresh from `(seed, chunk, tick)` and handed by value to the chunk's scan, so the
/// sequence a chunk observes never depends on work done in other chunks.
#[derive(Clone, Debug)]
pub struct TickRng {
    state: u32,
}

impl TickRng {
    pub fn new(seed: u64, chunk: ChunkCoord, tick: u64) -> Self {
        let mut h = splitmix64(seed);
        h = splitmix64(h ^ (chunk.x as u32 as u64));
        h = splitmix64(h ^ ((chunk.y as u32 as u64) << 32));
        h = splitmix64(h ^ tick);
        let state = (h ^ (h >> 32)) as u32;
        Self { state: if state == 0 { 0x6D2B_79F5 } else { state } }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        xorshift32(&mut self.state)
    }

    /// True with `percent`% probability. 100 always succeeds, 0 never does.
    #[inline]
    pub fn chance(&mut self, percent: u8) -> bool {
        if percent >= 100 {
            return true;
        }
        if percent == 0 {
            return false;
        }
        self.next_u32() % 100 < percent as u32
    }

    #[inline]
    pub fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }

    /// -1 or 1
    #[inline]
    pub fn sign(&mut self) -> i32 {
        if self.coin() { 1 } else { -1 }
    }

    /// Uniform in [0, n)
    #[inline]
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 { 0 } else { self.next_u32() % n }
    }
}
