//! Deterministic transaction-size estimation and fee calculation (§4.6 step 5).
//!
//! Every estimate is computed under a fixed dummy unlocking key so the same
//! inputs/outputs always produce the same fee — no randomness, no live
//! signature lengths.

use leicca_core::varint_size;

use crate::error::AnchorError;

const TX_OVERHEAD: usize = 10;
const INPUT_FIXED_OVERHEAD: usize = 32 + 4 + 1 + 4; // prev txid + index + varint(script len) byte + sequence
const OUTPUT_FIXED_OVERHEAD: usize = 8; // satoshis field

/// Fixed, non-random unlocking key used purely for size estimation — the
/// bytes themselves are never signed over or broadcast.
const DUMMY_SIGNATURE_LEN: usize = 72;
const DUMMY_PUBKEY_LEN: usize = 33;

/// Standard P2PKH locking script length: `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`.
pub const P2PKH_LOCKING_SCRIPT_LEN: usize = 25;

fn pushdata_overhead(len: usize) -> usize {
    if len <= 75 {
        1
    } else if len <= 0xff {
        2
    } else {
        3
    }
}

fn p2pkh_unlock_len() -> usize {
    pushdata_overhead(DUMMY_SIGNATURE_LEN) + DUMMY_SIGNATURE_LEN + pushdata_overhead(DUMMY_PUBKEY_LEN) + DUMMY_PUBKEY_LEN
}

/// BSV-21 token transfer unlocking script: P2PKH unlock plus a fixed token
/// inscription-reveal overhead.
fn bsv21_unlock_len() -> usize {
    p2pkh_unlock_len() + 34
}

/// Looks up an unlocking-script length estimator by template id. Unknown
/// template ids fall back to `p2pkh` (logged) rather than failing fee
/// estimation outright.
pub fn unlock_len(template_id: &str) -> usize {
    match template_id {
        "p2pkh" => p2pkh_unlock_len(),
        "bsv21" => bsv21_unlock_len(),
        other => {
            tracing::warn!(template = other, "unknown unlocking template, defaulting to p2pkh size");
            p2pkh_unlock_len()
        }
    }
}

/// `overhead(10) + Σ_inputs(32+4+1+unlockLen+4) + Σ_outputs(8+varint(scriptLen)+scriptLen)`.
pub fn estimate_transaction_size(input_unlock_lens: &[usize], output_script_lens: &[usize]) -> usize {
    let inputs_size: usize = input_unlock_lens.iter().map(|&unlock_len| INPUT_FIXED_OVERHEAD + unlock_len).sum();
    let outputs_size: usize = output_script_lens
        .iter()
        .map(|&len| OUTPUT_FIXED_OVERHEAD + varint_size(len as u64) + len)
        .sum();
    TX_OVERHEAD + inputs_size + outputs_size
}

/// `ceil(size / 1024 * 50)` satoshis, computed in integer arithmetic so the
/// result never depends on floating-point rounding behavior.
pub fn calculate_fee(size_bytes: usize) -> u64 {
    let size = size_bytes as u64;
    (size * 50).div_ceil(1024)
}

/// 600 sat baseline coverage check (§4.6 step 4) ahead of the real fee calc.
pub const BASELINE_FEE_SAT: u64 = 600;

pub fn check_covers_baseline(satoshis: u64, address: &str) -> Result<(), AnchorError> {
    if satoshis < BASELINE_FEE_SAT {
        return Err(AnchorError::InsufficientFunds {
            address: address.to_string(),
            need: BASELINE_FEE_SAT,
            have: satoshis,
        });
    }
    Ok(())
}
