use hmac::{Hmac, Mac};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::Sha256;

// Every draw consumes exactly one uniform sample in [0,1).
// Sources are swappable so draws can be replayed in tests or audited later.

pub type HmacSha256 = Hmac<Sha256>;

pub trait RandomSource: Send {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Nonce the next sample will be derived from, for sources that have one.
    fn nonce(&self) -> Option<u64> {
        None
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// OS-seeded generator for production use.
pub fn os_random() -> StdRng {
    StdRng::from_os_rng()
}

pub fn seeded_random(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Always yields the same sample. Values outside `[0,1)` are clamped.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl FixedRandom {
    /// Builds a source whose scaled draw value (`[0,100)`) is `percent`.
    pub fn percent(percent: f64) -> Self {
        Self(percent / 100.0)
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Maps 4 big-endian bytes to `[0,1)`.
fn unit_from_bytes(bytes: [u8; 4]) -> f64 {
    (u32::from_be_bytes(bytes) as f64) / (u32::MAX as f64 + 1.0)
}

/// Provably-fair source: HMAC-SHA256(server_seed, "client_seed:nonce").
/// Publishing the seed hash up front lets a participant verify a draw once
/// the seed is revealed. The nonce advances on every sample.
pub struct ProvablyFairRng {
    pub server_seed: String, // secret
    pub client_seed: String,
    pub nonce: u64,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes()).expect("HMAC key");
        let msg = format!("{}:{}", self.client_seed, self.nonce);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }
}

impl RandomSource for ProvablyFairRng {
    fn next_unit(&mut self) -> f64 {
        let digest = self.hmac_bytes();
        let v = unit_from_bytes([digest[0], digest[1], digest[2], digest[3]]);
        self.nonce += 1;
        v
    }

    fn nonce(&self) -> Option<u64> {
        Some(self.nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = ProvablyFairRng::new("server", "client", 1);
        let mut rng2 = ProvablyFairRng::new("server", "client", 1);
        assert_eq!(rng1.server_seed_hash_hex(), rng2.server_seed_hash_hex());
        assert_eq!(rng1.hmac_bytes().to_vec(), rng2.hmac_bytes().to_vec());
        let a: Vec<f64> = (0..5).map(|_| rng1.next_unit()).collect();
        let b: Vec<f64> = (0..5).map(|_| rng2.next_unit()).collect();
        assert_eq!(a, b);
        assert_eq!(rng1.nonce, 6);
    }

    #[test]
    fn test_samples_in_unit_range() {
        let mut rng = seeded_random(7);
        for _ in 0..1000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
        assert!(FixedRandom(1.0).next_unit() < 1.0);
    }

    #[test]
    fn test_unit_from_bytes_bounds() {
        assert_eq!(unit_from_bytes([0; 4]), 0.0);
        assert!(unit_from_bytes([0xff; 4]) < 1.0);
        assert_eq!(unit_from_bytes([0x80, 0, 0, 0]), 0.5);
    }

    #[test]
    fn test_nonce_exposed_only_by_hmac_source() {
        let mut rng = ProvablyFairRng::new("server", "client", 41);
        assert_eq!(rng.nonce(), Some(41));
        rng.next_unit();
        assert_eq!(rng.nonce(), Some(42));
        assert_eq!(seeded_random(1).nonce(), None);
        assert_eq!(FixedRandom(0.5).nonce(), None);
    }

    #[test]
    fn test_different_start_nonce_gives_different_sequence() {
        let mut a = ProvablyFairRng::new("server", "client", 0);
        let mut b = ProvablyFairRng::new("server", "client", 5);
        let xs: Vec<f64> = (0..5).map(|_| a.next_unit()).collect();
        let ys: Vec<f64> = (0..5).map(|_| b.next_unit()).collect();
        assert_ne!(xs, ys);
    }
}
