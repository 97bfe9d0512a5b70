use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator handle threaded through every draw of a generation stage.
///
/// ChaCha8 keeps its output stream stable across `rand` releases.
pub type GenRng = ChaCha8Rng;

/// Stream of the customer stage
pub const CUSTOMERS_STREAM: u64 = 1;
/// Stream of the sales stage
pub const SALES_STREAM: u64 = 2;

pub fn seeded_rng(seed: u64) -> GenRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generator for one stage of a run.
///
/// Stages share the configured seed but read disjoint ChaCha streams, so a
/// draw in one stage never mirrors a draw in another.
pub fn stage_rng(seed: u64, stream: u64) -> GenRng {
    let mut rng = seeded_rng(seed);
    rng.set_stream(stream);
    rng
}
