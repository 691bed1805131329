use rand::rngs::OsRng;
use rand::Rng;

/// Number of characters in a generated entity id.
pub const ID_LENGTH: usize = 32;

/// The 62-character alphanumeric alphabet ids are drawn from.
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Strategy for generating entity identifiers.
///
/// The façade never generates ids inline; it always goes through this trait
/// so tests can inject a deterministic generator. Collisions are not checked
/// by the adapter — callers needing collision-freedom supply their own
/// implementation.
pub trait IdGenerator: Send + Sync {
    /// Produces a fresh identifier.
    fn generate(&self) -> String;
}

/// Default id generator.
///
/// Draws [`ID_LENGTH`] characters uniformly from the alphanumeric alphabet
/// using the operating system's CSPRNG.
#[derive(Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        RandomIdGenerator
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut rng = OsRng;
        (0..ID_LENGTH)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_32_character_ids() {
        let generator = RandomIdGenerator::new();
        assert_eq!(generator.generate().len(), ID_LENGTH);
    }

    #[test]
    fn test_ids_are_alphanumeric() {
        let generator = RandomIdGenerator::new();
        let id = generator.generate();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_ids_are_distinct() {
        let generator = RandomIdGenerator::new();
        let mut ids: Vec<_> = (0..100).map(|_| generator.generate()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }
}
