//! Key handling and the raw signing primitive.
//!
//! Hierarchical wallet derivation lives outside this crate; everything here
//! is a single ed25519 keypair and the ledger address derived from it.

use crate::hash::public_key_hash;
use crate::transaction::{RawTransaction, SignedTransaction};
use crate::{Address, PublicKeyBytes, SignatureBytes};

use anyhow::Result;
use base64::{engine::general_purpose, Engine};
use ed25519::pkcs8::{DecodePrivateKey, EncodePrivateKey, KeypairBytes};
use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signature, Signer, Verifier};
use rand::rngs::OsRng;

pub fn generate_keypair() -> Keypair {
    let mut rng = OsRng {};
    Keypair::generate(&mut rng)
}

pub fn keypair_to_pem(keypair: Keypair) -> String {
    let kpb = keypair_to_bytes(keypair);
    kpb.to_pkcs8_pem(pkcs8::LineEnding::LF).unwrap().to_string()
}

pub fn keypair_from_pem(pem: &str) -> Result<Keypair> {
    let kpb = KeypairBytes::from_pkcs8_pem(pem).unwrap();
    keypair_from_bytes(kpb)
}

pub fn publickey_to_base64(pubkey: PublicKeyBytes) -> String {
    general_purpose::STANDARD.encode(pubkey)
}

pub fn publickey_from_base64(b64: &str) -> Result<PublicKeyBytes> {
    let key_vec = general_purpose::STANDARD.decode(b64)?;
    Ok(key_vec.as_slice().try_into()?)
}

pub fn keypair_to_bytes(keypair: Keypair) -> KeypairBytes {
    KeypairBytes {
        secret_key: keypair.secret.to_bytes(),
        public_key: Some(keypair.public.to_bytes()),
    }
}

pub fn keypair_from_bytes(kpb: KeypairBytes) -> Result<Keypair> {
    let secret = SecretKey::from_bytes(&kpb.secret_key)?;
    let public = match kpb.public_key {
        Some(pubkey) => PublicKey::from_bytes(&pubkey).unwrap(),
        None => (&secret).into(),
    };
    Ok(Keypair { secret, public })
}

/// Detached signature check against a 32-byte public key.
pub fn verify_signature(
    pubkey: PublicKeyBytes,
    message: &[u8],
    signature: SignatureBytes,
) -> Result<()> {
    let key = PublicKey::from_bytes(&pubkey)?;
    let sig = Signature::try_from(&signature[..])?;
    key.verify(message, &sig)?;
    Ok(())
}

/// Signing identity: an ed25519 keypair plus the ledger address derived
/// from its public key.
pub struct Account {
    keypair: Keypair,
    pub address: Address,
}

impl Account {
    pub fn new(keypair: Keypair) -> Self {
        let address = public_key_hash(keypair.public.as_bytes());
        Self { keypair, address }
    }

    pub fn generate() -> Self {
        Self::new(generate_keypair())
    }

    pub fn from_secret_hex(hex_str: &str) -> Result<Self> {
        let secret_bytes = hex::decode(hex_str)?;
        let secret = SecretKey::from_bytes(&secret_bytes)?;
        let public = (&secret).into();
        Ok(Self::new(Keypair { secret, public }))
    }

    pub fn public_key(&self) -> PublicKeyBytes {
        self.keypair.public.to_bytes()
    }

    pub fn address_hex(&self) -> String {
        hex::encode(self.address)
    }

    /// Signs the domain hash of the canonical raw transaction bytes,
    /// producing the record the ledger accepts for submission.
    pub fn sign_transaction(&self, raw_txn: RawTransaction) -> SignedTransaction {
        let digest = raw_txn.hash();
        let signature: Signature = self.keypair.sign(&digest);
        SignedTransaction {
            raw_txn,
            public_key: self.public_key(),
            signature: signature.to_bytes(),
        }
    }
}

#[cfg(test)]
mod crypto_test {
    use super::*;
    use crate::transaction::RawTransaction;

    #[test]
    fn address_derivation_test() {
        let account = Account::generate();
        assert_eq!(account.address, public_key_hash(&account.public_key()));
        assert_eq!(account.address_hex().len(), 64);
    }

    #[test]
    fn from_secret_hex_test() {
        let secret = hex::encode([0x42u8; 32]);
        let a = Account::from_secret_hex(&secret).unwrap();
        let b = Account::from_secret_hex(&secret).unwrap();
        assert_eq!(a.address, b.address);
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn sign_and_verify_test() {
        let account = Account::generate();
        let raw_txn = RawTransaction::new_transfer(
            account.address,
            0,
            [9u8; 32],
            1000,
            140_000,
            0,
            1_700_000_000,
        );
        let digest = raw_txn.hash();
        let signed = account.sign_transaction(raw_txn);
        verify_signature(signed.public_key, &digest, signed.signature).unwrap();

        let mut tampered = signed.signature;
        tampered[0] ^= 0x01;
        assert!(verify_signature(signed.public_key, &digest, tampered).is_err());
    }

    #[test]
    fn pem_round_trip_test() {
        let keypair = generate_keypair();
        let public = keypair.public.to_bytes();
        let pem = keypair_to_pem(keypair);
        let restored = keypair_from_pem(&pem).unwrap();
        assert_eq!(restored.public.to_bytes(), public);
    }

    #[test]
    fn base64_round_trip_test() {
        let pubkey = [0x5Au8; 32];
        let b64 = publickey_to_base64(pubkey);
        assert_eq!(publickey_from_base64(&b64).unwrap(), pubkey);
    }
}
