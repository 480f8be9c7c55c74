//! Known-Vector Integration Tests
//!
//! End-to-end checks of the public derivation API:
//! - Standard table vectors for the 24-word and 12-word test mnemonics
//! - Checksum gate on every word position
//! - Path grammar failures surfacing as `InvalidPath`
//! - Table order preservation

use pq_seed::wallet::stretch_phrase;
use pq_seed::{derive_all, derive_one, Algorithm, ErrorCode, PathTable, SeedReport};

// MARK: - Helper Functions

fn words(phrase: &str) -> Vec<&str> {
    phrase.split_whitespace().collect()
}

fn abandon_art() -> String {
    let mut phrase = "abandon ".repeat(23);
    phrase.push_str("art");
    phrase
}

fn abandon_about() -> String {
    let mut phrase = "abandon ".repeat(11);
    phrase.push_str("about");
    phrase
}

fn seed_of(report: &SeedReport, algorithm: Algorithm) -> String {
    report
        .get(algorithm)
        .map(|r| r.seed().expose_hex().to_string())
        .unwrap_or_default()
}

// MARK: - Vectors

#[test]
fn test_standard_table_vectors() {
    let phrase = abandon_art();
    let report = derive_all(&words(&phrase), "", &PathTable::standard()).unwrap();

    let expected = [
        (Algorithm::Legacy, "1053fae1b3ac64f178bcc21026fd06a3f4544ec2f35338b001f02d1d8efa3d5f"),
        (Algorithm::Falcon, "8f7bc8f5afef0237ce1ac23152ab785f36d60d875cd479a22ede211057a5bd6a"),
        (Algorithm::MlDsa, "68777d4bbcdb59a98fb981ce42cea30804a1d02742e2c8e1b6b1d595f0321b54"),
        (Algorithm::SlhDsa, "c6ca7dd2bf1e40b82026851a85e21b3898cfb9d7d15c13dee2819a3f406231e0"),
        (Algorithm::Xmss, "b2c95f97474e1e8dbb6a79c77e745285a21e299ee0d7f225a7533986d04a862e"),
    ];
    for (algorithm, seed) in expected {
        assert_eq!(seed_of(&report, algorithm), seed, "{}", algorithm);
    }

    assert_eq!(
        report.get(Algorithm::Legacy).and_then(|r| r.address()),
        Some("0xf278cf59f82edcf871d630f28ecc8056f25c1cdb")
    );
}

#[test]
fn test_twelve_word_vector_with_passphrase() {
    let master = stretch_phrase(&abandon_about(), "TREZOR").unwrap();
    assert_eq!(
        master.expose_hex().as_str(),
        "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
    );

    let phrase = abandon_about();
    let report = derive_all(&words(&phrase), "", &PathTable::standard()).unwrap();
    assert_eq!(
        report.get(Algorithm::Legacy).and_then(|r| r.address()),
        Some("0x9858effd232b4033e47d90003d41ec34ecaeda94")
    );
}

#[test]
fn test_derive_one_on_custom_account() {
    let master = stretch_phrase(&abandon_art(), "").unwrap();
    let record = derive_one(&master, Algorithm::Legacy, "m/44'/60'/1'/0/0").unwrap();
    assert_eq!(
        record.seed().expose_hex().as_str(),
        "b4538ac1ed7b1a256f87e483ca9e4eff66ca499b9101cb52cdd01ba360057bcc"
    );
    assert_eq!(record.path(), "m/44'/60'/1'/0/0");
}

// MARK: - Failure Modes

#[test]
fn test_out_of_dictionary_word_at_any_position_fails() {
    let phrase = abandon_art();
    for position in 0..24 {
        let mut tampered = words(&phrase);
        tampered[position] = "qwertyuiop";

        let err = derive_all(&tampered, "", &PathTable::standard()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMnemonic);
        assert!(err.message.contains(&format!("position {}", position + 1)));
        assert!(!err.to_string().contains("qwertyuiop"));
    }
}

#[test]
fn test_altered_checksum_word_fails() {
    let phrase = abandon_art();
    for replacement in ["abandon", "ability", "about"] {
        let mut tampered = words(&phrase);
        tampered[23] = replacement;
        let err = derive_all(&tampered, "", &PathTable::standard()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMnemonic);
    }
}

#[test]
fn test_malformed_paths_are_invalid_path() {
    let phrase = abandon_art();
    for bad in ["", "44'/60'", "m/abc", "m//0", "m/2147483648", "m/0/"] {
        let table = PathTable::empty().with_path(Algorithm::Falcon, bad);
        let err = derive_all(&words(&phrase), "", &table).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPath, "{:?}", bad);
        assert_eq!(
            err.details.as_deref(),
            Some(format!("algorithm=falcon path={}", bad).as_str())
        );
    }
}

// MARK: - Ordering

#[test]
fn test_reverse_table_order_is_preserved() {
    let mut table = PathTable::empty();
    for algorithm in Algorithm::ALL.iter().rev() {
        table
            .insert(*algorithm, algorithm.standard_path().to_string())
            .unwrap();
    }

    let phrase = abandon_art();
    let reversed = derive_all(&words(&phrase), "", &table).unwrap();
    let standard = derive_all(&words(&phrase), "", &PathTable::standard()).unwrap();

    let mut expected_order = Algorithm::ALL.to_vec();
    expected_order.reverse();
    assert_eq!(reversed.algorithms(), expected_order);

    for algorithm in Algorithm::ALL {
        assert_eq!(reversed.get(algorithm), standard.get(algorithm));
    }
}
