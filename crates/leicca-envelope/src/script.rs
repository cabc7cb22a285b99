//! Bitcoin `OP_FALSE OP_RETURN <pushdata>` locking script assembly.
//!
//! This is opcode plumbing, not a cryptographic primitive, so it's built
//! directly rather than treated as an opaque external dependency.

const OP_FALSE: u8 = 0x00;
const OP_RETURN: u8 = 0x6a;
const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;

/// Encode `data` as a minimal-push opcode sequence (direct push for <=75
/// bytes, `OP_PUSHDATA1/2/4` beyond that).
fn encode_pushdata(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 5);
    let len = data.len();
    if len <= 75 {
        out.push(len as u8);
    } else if len <= 0xff {
        out.push(OP_PUSHDATA1);
        out.push(len as u8);
    } else if len <= 0xffff {
        out.push(OP_PUSHDATA2);
        out.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        out.push(OP_PUSHDATA4);
        out.extend_from_slice(&(len as u32).to_le_bytes());
    }
    out.extend_from_slice(data);
    out
}

/// Build the full `OP_FALSE OP_RETURN <pushdata>` locking script embedding
/// `payload`.
pub fn build_op_return_script(payload: &[u8]) -> Vec<u8> {
    let mut script = vec![OP_FALSE, OP_RETURN];
    script.extend(encode_pushdata(payload));
    script
}

/// `build_op_return_script` rendered as lowercase hex, ready for the
/// anchoring transaction's output.
pub fn build_op_return_script_hex(payload: &[u8]) -> String {
    hex::encode(build_op_return_script(payload))
}
