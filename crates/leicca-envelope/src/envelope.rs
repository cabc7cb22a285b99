//! DocV1: a multi-receiver, password-independent, authenticated encryption
//! envelope (§4.5 EnvelopeCryptor cryptographic contract).
//!
//! One random data-encryption key (DEK) encrypts the plaintext once under
//! AES-256-GCM; the DEK itself is wrapped once per receiver under a
//! key-encryption key derived from an X25519 ECDH agreement between a
//! fresh ephemeral keypair and that receiver's static public key, stretched
//! through PBKDF2-HMAC-SHA256 at a fixed iteration count so every capsule
//! verifies under one parameter set.

use std::num::NonZeroU32;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::EnvelopeError;
use crate::script;

pub const ITERATIONS: u32 = 200_000;
const DOC_VERSION: &str = "DocV1";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReceiverWrap {
    receiver_public_key_hex: String,
    ephemeral_public_key_hex: String,
    nonce_hex: String,
    wrapped_dek_hex: String,
}

/// Non-secret envelope attributes returned alongside the plaintext on open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    pub filename: String,
    pub mimetype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocV1Envelope {
    version: String,
    receivers: Vec<ReceiverWrap>,
    data_nonce_hex: String,
    ciphertext_hex: String,
    signer_public_key_hex: String,
    signature_hex: String,
    metadata: EnvelopeMetadata,
}

/// Result of `seal`: the three artifacts §4.5 requires.
pub struct SealedEnvelope {
    /// Persist this, not just the script hex — it's the only thing a future
    /// `open` can decrypt.
    pub raw_ciphertext_bytes: Vec<u8>,
    pub op_return_script_hex: String,
    pub metadata: EnvelopeMetadata,
}

pub struct OpenedEnvelope {
    pub plaintext_bytes: Vec<u8>,
    pub metadata: EnvelopeMetadata,
}

/// Seal `plaintext` for every key in `receiver_public_keys` (must be
/// non-empty — callers are expected to always include both the wallet's
/// self-receiver key and the fixed audit receiver key).
#[allow(clippy::too_many_arguments)]
pub fn seal(
    plaintext: &[u8],
    signer_private_key: &SigningKey,
    receiver_public_keys: &[[u8; 32]],
    filename: impl Into<String>,
    mimetype: impl Into<String>,
    meta: Option<serde_json::Value>,
) -> Result<SealedEnvelope, EnvelopeError> {
    if receiver_public_keys.is_empty() {
        return Err(EnvelopeError::MissingKey("receiver".to_string()));
    }

    let mut dek = [0u8; 32];
    OsRng.fill_bytes(&mut dek);

    let mut receivers = Vec::with_capacity(receiver_public_keys.len());
    for receiver_pub_bytes in receiver_public_keys {
        receivers.push(wrap_dek_for_receiver(&dek, receiver_pub_bytes)?);
    }

    let data_cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&dek));
    dek.zeroize();

    let mut data_nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut data_nonce_bytes);
    let ciphertext = data_cipher
        .encrypt(Nonce::from_slice(&data_nonce_bytes), plaintext)
        .map_err(|_| EnvelopeError::CorruptCiphertext)?;

    let signature = signer_private_key.sign(&ciphertext);
    let metadata = EnvelopeMetadata {
        filename: filename.into(),
        mimetype: mimetype.into(),
        meta,
    };

    let envelope = DocV1Envelope {
        version: DOC_VERSION.to_string(),
        receivers,
        data_nonce_hex: hex::encode(data_nonce_bytes),
        ciphertext_hex: hex::encode(&ciphertext),
        signer_public_key_hex: hex::encode(signer_private_key.verifying_key().to_bytes()),
        signature_hex: hex::encode(signature.to_bytes()),
        metadata: metadata.clone(),
    };

    let raw_ciphertext_bytes = serde_json::to_vec(&envelope).map_err(|_| EnvelopeError::CorruptCiphertext)?;
    let op_return_script_hex = script::build_op_return_script_hex(&raw_ciphertext_bytes);

    Ok(SealedEnvelope {
        raw_ciphertext_bytes,
        op_return_script_hex,
        metadata,
    })
}

fn wrap_dek_for_receiver(dek: &[u8; 32], receiver_pub_bytes: &[u8; 32]) -> Result<ReceiverWrap, EnvelopeError> {
    let receiver_public = X25519PublicKey::from(*receiver_pub_bytes);
    let ephemeral_secret = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public = X25519PublicKey::from(&ephemeral_secret);
    let shared_secret = ephemeral_secret.diffie_hellman(&receiver_public);

    let salt = key_salt(receiver_pub_bytes, ephemeral_public.as_bytes());
    let kek = derive_kek(shared_secret.as_bytes(), &salt);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&kek));
    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);
    let wrapped_dek = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), dek.as_ref())
        .map_err(|_| EnvelopeError::CorruptCiphertext)?;

    Ok(ReceiverWrap {
        receiver_public_key_hex: hex::encode(receiver_pub_bytes),
        ephemeral_public_key_hex: hex::encode(ephemeral_public.as_bytes()),
        nonce_hex: hex::encode(nonce_bytes),
        wrapped_dek_hex: hex::encode(wrapped_dek),
    })
}

/// Open an envelope with any one receiver's private key.
pub fn open(raw_ciphertext_bytes: &[u8], receiver_private_key: &[u8; 32]) -> Result<OpenedEnvelope, EnvelopeError> {
    let envelope: DocV1Envelope =
        serde_json::from_slice(raw_ciphertext_bytes).map_err(|_| EnvelopeError::CorruptCiphertext)?;

    if envelope.version != DOC_VERSION {
        return Err(EnvelopeError::EnvelopeVersionMismatch);
    }

    let receiver_secret = StaticSecret::from(*receiver_private_key);
    let receiver_public = X25519PublicKey::from(&receiver_secret);
    let receiver_public_hex = hex::encode(receiver_public.as_bytes());

    let wrap = envelope
        .receivers
        .iter()
        .find(|r| r.receiver_public_key_hex == receiver_public_hex)
        .ok_or(EnvelopeError::WrongReceiver)?;

    let ephemeral_public_bytes = decode_32(&wrap.ephemeral_public_key_hex)?;
    let ephemeral_public = X25519PublicKey::from(ephemeral_public_bytes);
    let shared_secret = receiver_secret.diffie_hellman(&ephemeral_public);

    let salt = key_salt(receiver_public.as_bytes(), ephemeral_public.as_bytes());
    let kek = derive_kek(shared_secret.as_bytes(), &salt);

    let nonce_bytes = decode_12(&wrap.nonce_hex)?;
    let wrapped_dek_bytes = decode_hex(&wrap.wrapped_dek_hex)?;
    let kek_cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&kek));
    let dek_bytes = kek_cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), wrapped_dek_bytes.as_ref())
        .map_err(|_| EnvelopeError::CorruptCiphertext)?;

    let data_nonce_bytes = decode_12(&envelope.data_nonce_hex)?;
    let ciphertext_bytes = decode_hex(&envelope.ciphertext_hex)?;
    let data_cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&dek_bytes));
    let plaintext_bytes = data_cipher
        .decrypt(Nonce::from_slice(&data_nonce_bytes), ciphertext_bytes.as_ref())
        .map_err(|_| EnvelopeError::CorruptCiphertext)?;

    Ok(OpenedEnvelope {
        plaintext_bytes,
        metadata: envelope.metadata,
    })
}

fn key_salt(receiver_pub: &[u8; 32], ephemeral_pub: &[u8; 32]) -> [u8; 64] {
    let mut salt = [0u8; 64];
    salt[..32].copy_from_slice(receiver_pub);
    salt[32..].copy_from_slice(ephemeral_pub);
    salt
}

fn derive_kek(shared_secret: &[u8; 32], salt: &[u8]) -> [u8; 32] {
    let mut kek = [0u8; 32];
    ring::pbkdf2::derive(
        ring::pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(ITERATIONS).expect("ITERATIONS is a nonzero constant"),
        salt,
        shared_secret,
        &mut kek,
    );
    kek
}

fn decode_hex(s: &str) -> Result<Vec<u8>, EnvelopeError> {
    hex::decode(s).map_err(|_| EnvelopeError::CorruptCiphertext)
}

fn decode_32(s: &str) -> Result<[u8; 32], EnvelopeError> {
    decode_hex(s)?.try_into().map_err(|_| EnvelopeError::CorruptCiphertext)
}

fn decode_12(s: &str) -> Result<[u8; 12], EnvelopeError> {
    decode_hex(s)?.try_into().map_err(|_| EnvelopeError::CorruptCiphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng as RandOsRng;

    fn receiver_keypair() -> (StaticSecret, [u8; 32]) {
        let secret = StaticSecret::random_from_rng(RandOsRng);
        let public = X25519PublicKey::from(&secret);
        (secret, *public.as_bytes())
    }

    fn signer() -> SigningKey {
        SigningKey::generate(&mut RandOsRng)
    }

    #[test]
    fn seal_and_open_round_trips_plaintext() {
        let (receiver_secret, receiver_pub) = receiver_keypair();
        let sealed = seal(
            b"sensitive capsule bytes",
            &signer(),
            &[receiver_pub],
            "capsule.json",
            "application/json",
            None,
        )
        .unwrap();

        let opened = open(&sealed.raw_ciphertext_bytes, receiver_secret.to_bytes().as_ref().try_into().unwrap()).unwrap();
        assert_eq!(opened.plaintext_bytes, b"sensitive capsule bytes");
        assert_eq!(opened.metadata.filename, "capsule.json");
    }

    #[test]
    fn any_one_of_multiple_receivers_can_open() {
        let (audit_secret, audit_pub) = receiver_keypair();
        let (wallet_secret, wallet_pub) = receiver_keypair();
        let sealed = seal(
            b"multi receiver payload",
            &signer(),
            &[wallet_pub, audit_pub],
            "c.json",
            "application/json",
            None,
        )
        .unwrap();

        let opened_by_wallet = open(&sealed.raw_ciphertext_bytes, wallet_secret.to_bytes().as_ref().try_into().unwrap()).unwrap();
        let opened_by_audit = open(&sealed.raw_ciphertext_bytes, audit_secret.to_bytes().as_ref().try_into().unwrap()).unwrap();
        assert_eq!(opened_by_wallet.plaintext_bytes, opened_by_audit.plaintext_bytes);
    }

    #[test]
    fn wrong_receiver_key_fails() {
        let (_receiver_secret, receiver_pub) = receiver_keypair();
        let (other_secret, _other_pub) = receiver_keypair();
        let sealed = seal(b"data", &signer(), &[receiver_pub], "f", "m", None).unwrap();

        let err = open(&sealed.raw_ciphertext_bytes, other_secret.to_bytes().as_ref().try_into().unwrap()).unwrap_err();
        assert!(matches!(err, EnvelopeError::WrongReceiver));
    }

    #[test]
    fn corrupt_ciphertext_is_rejected() {
        let (receiver_secret, receiver_pub) = receiver_keypair();
        let mut sealed = seal(b"data", &signer(), &[receiver_pub], "f", "m", None).unwrap();
        let last = sealed.raw_ciphertext_bytes.len() - 2;
        sealed.raw_ciphertext_bytes[last] ^= 0xff;

        let err = open(&sealed.raw_ciphertext_bytes, receiver_secret.to_bytes().as_ref().try_into().unwrap());
        assert!(err.is_err());
    }

    #[test]
    fn seal_requires_at_least_one_receiver() {
        let err = seal(b"data", &signer(), &[], "f", "m", None).unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingKey(_)));
    }
}
