//! Ready-to-use SM4 instance bound to one backend.

use log::debug;
use sm4_core::{
    ecb, expand_key_with, Backend, Block, Error, Result, RoundKeys, Sm4Key, TableLookup, BLOCK_SIZE,
};

use crate::batch::{crypt_batched, crypt_scalar};
use crate::detect::best_backend;

/// Options for building an [`Sm4`] instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sm4Config {
    /// Backend to run on. `None` picks [`best_backend`].
    pub backend: Option<Backend>,
}

impl Sm4Config {
    /// Config pinned to one backend.
    pub fn with_backend(backend: Backend) -> Self {
        Self { backend: Some(backend) }
    }
}

/// Selected substitution strategy; hardware variants carry their detection token.
#[derive(Clone, Copy, Debug)]
enum Strategy {
    Table(TableLookup),
    #[cfg(target_arch = "x86_64")]
    AesNi(crate::x86::AesNiSbox),
    #[cfg(target_arch = "x86_64")]
    Gfni(crate::x86::GfniSbox),
}

impl Strategy {
    fn select(backend: Backend) -> Result<Self> {
        let strategy = match backend {
            Backend::Reference => Some(Strategy::Table(TableLookup)),
            #[cfg(target_arch = "x86_64")]
            Backend::AesNi => crate::x86::AesNiSbox::detect().map(Strategy::AesNi),
            #[cfg(target_arch = "x86_64")]
            Backend::Gfni => crate::x86::GfniSbox::detect().map(Strategy::Gfni),
            #[cfg(not(target_arch = "x86_64"))]
            Backend::AesNi | Backend::Gfni => None,
        };
        strategy.ok_or_else(|| {
            debug!("sm4: backend {backend} rejected, CPU lacks the required extensions");
            Error::UnsupportedBackend(backend)
        })
    }

    fn expand_key(&self, key: &Sm4Key) -> RoundKeys {
        match self {
            Strategy::Table(s) => expand_key_with(s, key),
            #[cfg(target_arch = "x86_64")]
            Strategy::AesNi(s) => expand_key_with(s, key),
            #[cfg(target_arch = "x86_64")]
            Strategy::Gfni(s) => expand_key_with(s, key),
        }
    }

    fn crypt(&self, round_keys: &[u32; 32], data: &mut [u8]) {
        match self {
            Strategy::Table(s) => crypt_scalar(s, round_keys, data.as_chunks_mut::<BLOCK_SIZE>().0),
            #[cfg(target_arch = "x86_64")]
            Strategy::AesNi(s) => crypt_batched(s, round_keys, data),
            #[cfg(target_arch = "x86_64")]
            Strategy::Gfni(s) => crypt_batched(s, round_keys, data),
        }
    }
}

/// An SM4 key schedule bound to a backend.
///
/// Round keys are expanded once at construction with the backend's own S-box;
/// all backends produce identical round keys and identical ciphertext. The value
/// is immutable, so one instance can be shared across threads.
#[derive(Clone)]
pub struct Sm4 {
    backend: Backend,
    strategy: Strategy,
    enc_keys: RoundKeys,
    dec_keys: RoundKeys,
}

impl Sm4 {
    /// Expands `key` for `backend`.
    ///
    /// Fails with [`Error::KeyLength`] unless `key` is 16 bytes, and with
    /// [`Error::UnsupportedBackend`] if this CPU cannot run `backend`.
    pub fn new(key: &[u8], backend: Backend) -> Result<Self> {
        Self::with_config(key, Sm4Config::with_backend(backend))
    }

    /// Expands `key` using the fastest backend this CPU supports.
    pub fn auto(key: &[u8]) -> Result<Self> {
        Self::with_config(key, Sm4Config::default())
    }

    /// Expands `key` according to `config`.
    pub fn with_config(key: &[u8], config: Sm4Config) -> Result<Self> {
        let key = Sm4Key::try_from(key)?;
        Self::from_key(&key, config.backend.unwrap_or_else(best_backend))
    }

    /// Expands an already validated key.
    pub fn from_key(key: &Sm4Key, backend: Backend) -> Result<Self> {
        let strategy = Strategy::select(backend)?;
        let enc_keys = strategy.expand_key(key);
        debug!("sm4: expanded key schedule on {backend} backend");
        Ok(Self {
            backend,
            strategy,
            enc_keys,
            dec_keys: enc_keys.reversed(),
        })
    }

    /// Backend this instance runs on.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Encryption-order round keys.
    pub fn round_keys(&self) -> &RoundKeys {
        &self.enc_keys
    }

    /// Encrypts one block.
    pub fn encrypt_block(&self, block: &Block) -> Block {
        let mut out = *block;
        self.strategy.crypt(self.enc_keys.as_words(), &mut out);
        out
    }

    /// Decrypts one block.
    pub fn decrypt_block(&self, block: &Block) -> Block {
        let mut out = *block;
        self.strategy.crypt(self.dec_keys.as_words(), &mut out);
        out
    }

    /// Encrypts consecutive blocks in place.
    ///
    /// Hardware backends process four blocks per pass and finish any remaining
    /// one to three blocks singly with the same S-box.
    pub fn encrypt_in_place(&self, data: &mut [u8]) -> Result<()> {
        ecb::check_alignment(data.len())?;
        self.strategy.crypt(self.enc_keys.as_words(), data);
        Ok(())
    }

    /// Decrypts consecutive blocks in place.
    pub fn decrypt_in_place(&self, data: &mut [u8]) -> Result<()> {
        ecb::check_alignment(data.len())?;
        self.strategy.crypt(self.dec_keys.as_words(), data);
        Ok(())
    }

    /// Encrypts `plaintext` into a new buffer of the same length.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut out = plaintext.to_vec();
        self.encrypt_in_place(&mut out)?;
        Ok(out)
    }

    /// Decrypts `ciphertext` into a new buffer of the same length.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut out = ciphertext.to_vec();
        self.decrypt_in_place(&mut out)?;
        Ok(out)
    }
}

impl core::fmt::Debug for Sm4 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sm4")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm4_core::{encrypt_block, expand_key};

    const KEY: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32, 0x10,
    ];
    const CIPHERTEXT: [u8; 16] = [
        0x68, 0x1e, 0xdf, 0x34, 0xd2, 0x06, 0x96, 0x5e, 0x86, 0xb3, 0xe9, 0x4f, 0x53, 0x6e, 0x42, 0x46,
    ];

    #[test]
    fn reference_backend_known_vector() {
        let sm4 = Sm4::new(&KEY, Backend::Reference).unwrap();
        assert_eq!(sm4.encrypt_block(&KEY), CIPHERTEXT);
        assert_eq!(sm4.decrypt_block(&CIPHERTEXT), KEY);
        assert_eq!(sm4.round_keys(), &expand_key(&Sm4Key::from(KEY)));
    }

    #[test]
    fn key_length_checked_before_backend() {
        for backend in Backend::ALL {
            assert_eq!(
                Sm4::new(&KEY[..15], backend).unwrap_err(),
                Error::KeyLength { len: 15 }
            );
        }
    }

    #[test]
    fn unsupported_backend_is_rejected() {
        for backend in Backend::ALL {
            match Sm4::new(&KEY, backend) {
                Ok(sm4) => {
                    assert!(crate::is_supported(backend));
                    assert_eq!(sm4.backend(), backend);
                }
                Err(err) => {
                    assert!(!crate::is_supported(backend));
                    assert_eq!(err, Error::UnsupportedBackend(backend));
                }
            }
        }
    }

    #[test]
    fn auto_uses_best_backend() {
        let sm4 = Sm4::auto(&KEY).unwrap();
        assert_eq!(sm4.backend(), best_backend());
        assert_eq!(sm4.encrypt_block(&KEY), CIPHERTEXT);
    }

    #[test]
    fn misaligned_buffers_are_rejected() {
        let sm4 = Sm4::new(&KEY, Backend::Reference).unwrap();
        let mut data = [0u8; 33];
        assert_eq!(sm4.encrypt_in_place(&mut data), Err(Error::BlockAlignment { len: 33 }));
        assert_eq!(sm4.decrypt(&data[..17]), Err(Error::BlockAlignment { len: 17 }));
        assert_eq!(data, [0u8; 33]);
        assert_eq!(sm4.encrypt(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn buffer_is_blockwise() {
        let sm4 = Sm4::new(&KEY, Backend::Reference).unwrap();
        let rks = expand_key(&Sm4Key::from(KEY));
        let data: Vec<u8> = (0..80u8).collect();
        let out = sm4.encrypt(&data).unwrap();
        for (i, chunk) in out.chunks_exact(16).enumerate() {
            let block: Block = data[i * 16..(i + 1) * 16].try_into().unwrap();
            assert_eq!(chunk, encrypt_block(&block, &rks));
        }
        assert_eq!(sm4.decrypt(&out).unwrap(), data);
    }

    #[test]
    fn debug_hides_round_keys() {
        let sm4 = Sm4::new(&KEY, Backend::Reference).unwrap();
        let shown = format!("{sm4:?}");
        assert!(shown.contains("Reference"));
        assert!(!shown.contains("f12186f9"));
    }

    #[test]
    fn instances_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Sm4>();
    }
}
