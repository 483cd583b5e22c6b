#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Child seed for one stream (`label`, `index`) under a batch seed.
pub fn derive_seed(batch_seed: u64, label: &str, index: u64) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(batch_seed);
    h.write_bytes(label.as_bytes());
    h.write_u64(index);
    h.finish()
}

/// Number of samples covering `duration_ms` at `sample_rate`, rounded to nearest.
pub fn samples_for_duration(duration_ms: u32, sample_rate: u32) -> usize {
    (f64::from(duration_ms) * f64::from(sample_rate) / 1000.0).round() as usize
}

pub(crate) fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}
