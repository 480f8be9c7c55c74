//! Mnemonic Seed Stretching
//!
//! Validates a BIP39 word sequence against the English word list and
//! stretches it into the 64-byte master seed with PBKDF2-HMAC-SHA512
//! (2048 rounds, salt `"mnemonic" || passphrase`, NFKD-normalized input).
//!
//! SECURITY: the joined phrase, the parsed word indices and the raw seed
//! array are zeroized on every exit path. Errors report word positions,
//! never words.

use bip39::{Language, Mnemonic};
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, Zeroizing};

use crate::security::MasterSeed;

/// Word counts accepted for derivation (128 and 256 bits of entropy)
pub const SUPPORTED_WORD_COUNTS: [usize; 2] = [12, 24];

/// Reasons a mnemonic is rejected. All are fatal and not retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MnemonicError {
    #[error("mnemonic has {count} words, expected 12 or 24")]
    WrongWordCount { count: usize },

    #[error("word at position {position} is not in the BIP39 English word list")]
    UnknownWord { position: usize },

    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,

    #[error("mnemonic rejected: {0}")]
    Unsupported(String),
}

impl From<bip39::Error> for MnemonicError {
    fn from(e: bip39::Error) -> Self {
        match e {
            bip39::Error::BadWordCount(count) => MnemonicError::WrongWordCount { count },
            bip39::Error::UnknownWord(index) => MnemonicError::UnknownWord { position: index + 1 },
            bip39::Error::InvalidChecksum => MnemonicError::ChecksumMismatch,
            other => MnemonicError::Unsupported(other.to_string()),
        }
    }
}

/// Stretch a validated word sequence into the master seed
pub fn stretch<S: AsRef<str>>(words: &[S], passphrase: &str) -> Result<MasterSeed, MnemonicError> {
    let mnemonic = parse_words(words)?;

    let normalized_passphrase: Zeroizing<String> = Zeroizing::new(passphrase.nfkd().collect());
    let mut seed = mnemonic.to_seed_normalized(&normalized_passphrase);

    Ok(MasterSeed::from_array_wiping(&mut seed))
}

/// Stretch a whitespace-separated phrase
pub fn stretch_phrase(phrase: &str, passphrase: &str) -> Result<MasterSeed, MnemonicError> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    stretch(&words, passphrase)
}

/// Validate word count, dictionary membership and checksum without stretching
pub fn validate_words<S: AsRef<str>>(words: &[S]) -> Result<(), MnemonicError> {
    parse_words(words).map(|_| ())
}

/// Check if a mnemonic phrase is acceptable for derivation
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    validate_words(&words).is_ok()
}

fn parse_words<S: AsRef<str>>(words: &[S]) -> Result<Zeroizing<Mnemonic>, MnemonicError> {
    // bip39 also accepts 15/18/21 words; the derivation tree does not
    if !SUPPORTED_WORD_COUNTS.contains(&words.len()) {
        return Err(MnemonicError::WrongWordCount { count: words.len() });
    }

    let mut phrase = Zeroizing::new(String::with_capacity(words.len() * 9));
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            phrase.push(' ');
        }
        let mut normalized: String = word.as_ref().nfkd().collect();
        // a token bip39 would re-split (or drop) is not a dictionary word
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            normalized.zeroize();
            return Err(MnemonicError::UnknownWord { position: i + 1 });
        }
        phrase.push_str(&normalized);
        normalized.zeroize();
    }

    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &phrase)?;
    Ok(Zeroizing::new(mnemonic))
}
