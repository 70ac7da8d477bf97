//! Property-based tests for keyseal primitives
//!
//! These tests verify the invariants the session relies on:
//!
//! 1. **Commutativity**: agree(A.priv, B.pub) == agree(B.priv, A.pub)
//! 2. **Determinism**: same derivation inputs always produce the same key
//! 3. **Round-trip**: open(seal(m)) == m for all messages, including empty
//! 4. **Tamper detection**: any single flipped bit fails authentication
//! 5. **Size validation**: keys must be 32 bytes, nonces 12 bytes

use keyseal_crypto::{
    CryptoError, KEY_SIZE, KeyPair, NONCE_SIZE, SESSION_KEY_LABEL, SealedMessage, SeededRandom,
    SessionKey, derive_key, derive_session_key, open, seal,
};
use proptest::prelude::*;

fn array_32() -> impl Strategy<Value = [u8; 32]> {
    prop::collection::vec(any::<u8>(), 32..=32).prop_map(|v| {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&v);
        arr
    })
}

fn array_12() -> impl Strategy<Value = [u8; 12]> {
    prop::collection::vec(any::<u8>(), 12..=12).prop_map(|v| {
        let mut arr = [0u8; 12];
        arr.copy_from_slice(&v);
        arr
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_agreement_commutative(seed in any::<u64>()) {
        let mut rng = SeededRandom::from_u64(seed);
        let alice = KeyPair::generate(&mut rng).unwrap();
        let bob = KeyPair::generate(&mut rng).unwrap();

        let alice_shared = alice.compute_shared_secret(bob.public_key()).unwrap();
        let bob_shared = bob.compute_shared_secret(alice.public_key()).unwrap();

        prop_assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[test]
    fn prop_agreement_commutative_for_raw_scalars(a in array_32(), b in array_32()) {
        let alice = KeyPair::from_private_bytes(a);
        let bob = KeyPair::from_private_bytes(b);

        let alice_shared = alice.compute_shared_secret(bob.public_key()).unwrap();
        let bob_shared = bob.compute_shared_secret(alice.public_key()).unwrap();

        prop_assert!(alice_shared.ct_eq(&bob_shared));
    }

    #[test]
    fn prop_both_parties_derive_same_session_key(seed in any::<u64>()) {
        let mut rng = SeededRandom::from_u64(seed);
        let alice = KeyPair::generate(&mut rng).unwrap();
        let bob = KeyPair::generate(&mut rng).unwrap();

        let alice_key = derive_session_key(
            &alice.compute_shared_secret(bob.public_key()).unwrap(),
            SESSION_KEY_LABEL,
            None,
        ).unwrap();
        let bob_key = derive_session_key(
            &bob.compute_shared_secret(alice.public_key()).unwrap(),
            SESSION_KEY_LABEL,
            None,
        ).unwrap();

        prop_assert!(alice_key.ct_eq(&bob_key));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_derivation_deterministic(
        secret in prop::collection::vec(any::<u8>(), 0..100),
        label in prop::collection::vec(any::<u8>(), 0..64),
        salt in prop::option::of(prop::collection::vec(any::<u8>(), 0..64)),
        length in 0usize..=512,
    ) {
        let okm1 = derive_key(&secret, &label, salt.as_deref(), length).unwrap();
        let okm2 = derive_key(&secret, &label, salt.as_deref(), length).unwrap();

        prop_assert_eq!(okm1.len(), length);
        prop_assert_eq!(okm1, okm2);
    }

    #[test]
    fn prop_derivation_label_sensitive(
        secret in prop::collection::vec(any::<u8>(), 1..64),
        label_a in prop::collection::vec(any::<u8>(), 0..32),
        label_b in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        prop_assume!(label_a != label_b);

        let okm_a = derive_key(&secret, &label_a, None, 32).unwrap();
        let okm_b = derive_key(&secret, &label_b, None, 32).unwrap();

        prop_assert_ne!(okm_a, okm_b);
    }

    #[test]
    fn prop_derivation_secret_sensitive(
        secret_a in prop::collection::vec(any::<u8>(), 1..64),
        secret_b in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        prop_assume!(secret_a != secret_b);

        let okm_a = derive_key(&secret_a, SESSION_KEY_LABEL, None, 32).unwrap();
        let okm_b = derive_key(&secret_b, SESSION_KEY_LABEL, None, 32).unwrap();

        prop_assert_ne!(okm_a, okm_b);
    }

    #[test]
    fn prop_derivation_rejects_oversized_output(extra in 1usize..10_000) {
        let result = derive_key(b"secret", SESSION_KEY_LABEL, None, 255 * 32 + extra);

        let is_unsupported = matches!(result, Err(CryptoError::OutputLengthUnsupported { .. }));
        prop_assert!(is_unsupported);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_seal_open_roundtrip(
        key in array_32(),
        nonce in array_12(),
        plaintext in prop::collection::vec(any::<u8>(), 0..1000),
    ) {
        let ciphertext = seal(&key, &nonce, &plaintext).unwrap();
        let decrypted = open(&key, &nonce, &ciphertext).unwrap();

        prop_assert_eq!(decrypted.as_slice(), plaintext.as_slice());
    }

    #[test]
    fn prop_single_bit_flip_detected(
        key in array_32(),
        nonce in array_12(),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut ciphertext = seal(&key, &nonce, &plaintext).unwrap();
        let index = position.index(ciphertext.len());
        ciphertext[index] ^= 1 << bit;

        let result = open(&key, &nonce, &ciphertext);
        prop_assert_eq!(result.unwrap_err(), CryptoError::AuthenticationFailed);
    }

    #[test]
    fn prop_packaged_bit_flip_detected(
        seed in any::<u64>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut rng = SeededRandom::from_u64(seed);
        let key = SessionKey::from_bytes([0x5A; KEY_SIZE]);

        let mut packaged = SealedMessage::seal(&key, &mut rng, &plaintext).unwrap().to_bytes();
        let index = position.index(packaged.len());
        packaged[index] ^= 1 << bit;

        let received = SealedMessage::from_bytes(&packaged).unwrap();
        prop_assert_eq!(received.open(&key).unwrap_err(), CryptoError::AuthenticationFailed);
    }

    #[test]
    fn prop_invalid_sizes_rejected(
        key_len in 0usize..64,
        nonce_len in 0usize..32,
    ) {
        prop_assume!(key_len != KEY_SIZE || nonce_len != NONCE_SIZE);

        let key = vec![0u8; key_len];
        let nonce = vec![0u8; nonce_len];
        let expected = CryptoError::InvalidKeyOrNonceSize { key_len, nonce_len };

        prop_assert_eq!(seal(&key, &nonce, b"data").unwrap_err(), expected.clone());
        prop_assert_eq!(open(&key, &nonce, &[0u8; 32]).unwrap_err(), expected);
    }
}
