use sha2::{Digest, Sha256};

use crate::error::{RewardError, RewardResult};

/// Per-opening randomness.
///
/// `randomness = sha256( beacon || opener_bytes || opening_id_u64_be )`
///
/// Mixing in the opener and the opening id gives every opening that targets the
/// same beacon round its own draw.
pub fn derive_randomness(beacon: &[u8], opener: &str, opening_id: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(beacon);
    hasher.update(opener.as_bytes());
    hasher.update(opening_id.to_be_bytes());
    hasher.finalize().into()
}

/// Reduces 32 bytes of randomness to a draw in `[0, space)`.
///
/// `draw = uint128(randomness[0..16]) % space`
pub fn draw_from_randomness(randomness: &[u8; 32], space: u64) -> RewardResult<u64> {
    if space == 0 {
        return Err(RewardError::EmptyTable);
    }
    let mut ticket_bytes = [0u8; 16];
    ticket_bytes.copy_from_slice(&randomness[0..16]);
    let ticket = u128::from_be_bytes(ticket_bytes);
    Ok((ticket % u128::from(space)) as u64)
}
