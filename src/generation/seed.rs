use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeedSource {
    /// OS entropy, falling back to the clock if it is unavailable.
    Entropy,
    Fixed(u32),
}

/// Hands out seeds for a batch. One base value is drawn per batch and seed
/// `i` is `base + i`, so seeds within a batch never collide.
#[derive(Debug, Clone)]
pub struct SeedGenerator {
    source: SeedSource,
}

impl SeedGenerator {
    pub fn new() -> Self {
        Self {
            source: SeedSource::Entropy,
        }
    }

    /// Always starts batches at `base`. Useful for reproducible output.
    pub fn fixed(base: u32) -> Self {
        Self {
            source: SeedSource::Fixed(base),
        }
    }

    pub fn next_batch(&self, count: usize) -> Vec<u32> {
        let base = self.draw();
        (0..count as u32).map(|i| base.wrapping_add(i)).collect()
    }

    fn draw(&self) -> u32 {
        match self.source {
            SeedSource::Fixed(base) => base,
            SeedSource::Entropy => {
                let mut bytes = [0u8; 4];
                match OsRng.try_fill_bytes(&mut bytes) {
                    Ok(()) => u32::from_le_bytes(bytes),
                    Err(e) => {
                        log::warn!("OS entropy unavailable ({}), seeding from clock", e);
                        clock_seed()
                    }
                }
            }
        }
    }
}

impl Default for SeedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn clock_seed() -> u32 {
    let now = Utc::now();
    (now.timestamp_millis() as u64 ^ u64::from(now.timestamp_subsec_nanos())) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_batches_are_distinct() {
        let generator = SeedGenerator::new();
        for count in [1, 2, 4] {
            let seeds = generator.next_batch(count);
            assert_eq!(seeds.len(), count);
            let unique: HashSet<_> = seeds.iter().collect();
            assert_eq!(unique.len(), count);
        }
    }

    #[test]
    fn test_fixed_base_wraps_without_collision() {
        let seeds = SeedGenerator::fixed(u32::MAX - 1).next_batch(4);
        assert_eq!(seeds, vec![u32::MAX - 1, u32::MAX, 0, 1]);
    }

    #[test]
    fn test_fixed_base_is_reproducible() {
        let generator = SeedGenerator::fixed(1000);
        assert_eq!(generator.next_batch(2), vec![1000, 1001]);
        assert_eq!(generator.next_batch(2), vec![1000, 1001]);
    }

    #[test]
    fn test_clock_seed_varies_with_time() {
        let first = clock_seed();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_ne!(first, clock_seed());
    }
}
