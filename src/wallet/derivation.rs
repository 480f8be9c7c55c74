//! Seed Derivation
//!
//! Fans one master seed out over a path table: stretch once, derive the
//! master node once, then walk each configured path from that node. The
//! leaf private key is the algorithm's 32-byte seed.
//!
//! No partial reports: either every table entry yields a record or the
//! call fails with the first failing algorithm and path in `details`.
//!
//! SECURITY: the master seed and every node are dropped (and wiped) before
//! returning. Only the leaf seeds leave this module.

use secp256k1::{Secp256k1, Signing};

use super::address::AddressStyle;
use super::derivation_path::parse_path;
use super::hd_node::HdNode;
use super::mnemonic::stretch;
use super::path_table::PathTable;
use crate::error::SeedResult;
use crate::security::MasterSeed;
use crate::types::{Algorithm, AlgorithmSeedRecord, SeedReport};
use crate::log_debug;

const MODULE: &str = "derivation";

/// Derive every algorithm seed in `table` from a mnemonic
pub fn derive_all<S: AsRef<str>>(
    words: &[S],
    passphrase: &str,
    table: &PathTable,
) -> SeedResult<SeedReport> {
    derive_all_with_style(words, passphrase, table, AddressStyle::default())
}

/// Same as [`derive_all`], choosing how the legacy address is rendered
pub fn derive_all_with_style<S: AsRef<str>>(
    words: &[S],
    passphrase: &str,
    table: &PathTable,
    style: AddressStyle,
) -> SeedResult<SeedReport> {
    let master_seed = stretch(words, passphrase)?;
    derive_all_from_seed(&master_seed, table, style)
}

/// Derive every algorithm seed in `table` from an already stretched seed
pub fn derive_all_from_seed(
    master_seed: &MasterSeed,
    table: &PathTable,
    style: AddressStyle,
) -> SeedResult<SeedReport> {
    let secp = Secp256k1::new();
    let master = HdNode::master(master_seed.expose())?;

    let mut report = SeedReport::new();
    for (algorithm, path) in table.iter() {
        let record = derive_record(&secp, &master, algorithm, path, style)
            .map_err(|e| e.with_details(failure_details(algorithm, path)))?;
        report.push(record)?;
    }

    log_debug!(MODULE, "Derivation complete", algorithms = report.len());
    Ok(report)
}

/// Derive a single record from an already stretched seed
pub fn derive_one(
    master_seed: &MasterSeed,
    algorithm: Algorithm,
    path: &str,
) -> SeedResult<AlgorithmSeedRecord> {
    let secp = Secp256k1::new();
    HdNode::master(master_seed.expose())
        .map_err(Into::into)
        .and_then(|master| derive_record(&secp, &master, algorithm, path, AddressStyle::default()))
        .map_err(|e| e.with_details(failure_details(algorithm, path)))
}

fn derive_record<C: Signing>(
    secp: &Secp256k1<C>,
    master: &HdNode,
    algorithm: Algorithm,
    path: &str,
    style: AddressStyle,
) -> SeedResult<AlgorithmSeedRecord> {
    let parsed = parse_path(path)?;
    for warning in parsed.lint() {
        log_debug!(MODULE, warning, algorithm = algorithm, path = path);
    }

    let seed = master.derive_path(secp, &parsed)?.into_seed();

    let address = if algorithm.attaches_address() {
        Some(style.render(secp, seed.expose())?)
    } else {
        None
    };

    log_debug!(
        MODULE,
        "Derived algorithm seed",
        algorithm = algorithm,
        path = path,
        depth = parsed.depth(),
    );

    Ok(AlgorithmSeedRecord::new(algorithm, path.to_string(), seed, address))
}

fn failure_details(algorithm: Algorithm, path: &str) -> String {
    format!("algorithm={} path={}", algorithm, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::wallet::mnemonic::stretch_phrase;

    fn abandon_art() -> Vec<&'static str> {
        let mut words = vec!["abandon"; 23];
        words.push("art");
        words
    }

    fn seed_hex(report: &SeedReport, algorithm: Algorithm) -> String {
        report.get(algorithm).unwrap().seed().expose_hex().to_string()
    }

    #[test]
    fn test_standard_table_known_vector() {
        let report = derive_all(&abandon_art(), "", &PathTable::standard()).unwrap();
        assert_eq!(report.len(), 5);

        let legacy = report.get(Algorithm::Legacy).unwrap();
        assert_eq!(
            legacy.seed().expose_hex().as_str(),
            "1053fae1b3ac64f178bcc21026fd06a3f4544ec2f35338b001f02d1d8efa3d5f"
        );
        assert_eq!(legacy.address(), Some("0xf278cf59f82edcf871d630f28ecc8056f25c1cdb"));

        assert_eq!(
            seed_hex(&report, Algorithm::Falcon),
            "8f7bc8f5afef0237ce1ac23152ab785f36d60d875cd479a22ede211057a5bd6a"
        );
        assert_eq!(
            seed_hex(&report, Algorithm::MlDsa),
            "68777d4bbcdb59a98fb981ce42cea30804a1d02742e2c8e1b6b1d595f0321b54"
        );
        assert_eq!(
            seed_hex(&report, Algorithm::SlhDsa),
            "c6ca7dd2bf1e40b82026851a85e21b3898cfb9d7d15c13dee2819a3f406231e0"
        );
        assert_eq!(
            seed_hex(&report, Algorithm::Xmss),
            "b2c95f97474e1e8dbb6a79c77e745285a21e299ee0d7f225a7533986d04a862e"
        );

        for record in &report {
            assert_eq!(record.seed_length(), 256);
            assert_eq!(record.address().is_some(), record.algorithm().attaches_address());
        }
    }

    #[test]
    fn test_checksum_style() {
        let report = derive_all_with_style(
            &abandon_art(),
            "",
            &PathTable::standard(),
            AddressStyle::Checksum,
        )
        .unwrap();
        assert_eq!(
            report.get(Algorithm::Legacy).unwrap().address(),
            Some("0xF278cF59F82eDcf871d630F28EcC8056f25C1cdb")
        );
    }

    #[test]
    fn test_passphrase_changes_every_seed() {
        let plain = derive_all(&abandon_art(), "", &PathTable::standard()).unwrap();
        let salted = derive_all(&abandon_art(), "TREZOR", &PathTable::standard()).unwrap();

        assert_eq!(
            seed_hex(&salted, Algorithm::Legacy),
            "f9399e5d4ddb63856a95268e2806def3ea55c1fcac22f90a5de3a72667a9408c"
        );
        for algorithm in Algorithm::ALL {
            assert_ne!(seed_hex(&plain, algorithm), seed_hex(&salted, algorithm));
        }
    }

    #[test]
    fn test_output_follows_table_order() {
        let table: PathTable = serde_json::from_str(
            r#"{"xmss":"m/44'/9003'/0'/0/0","slh_dsa":"m/44'/9002'/0'/0/0","legacy":"m/44'/60'/0'/0/0"}"#,
        )
        .unwrap();
        let report = derive_all(&abandon_art(), "", &table).unwrap();
        assert_eq!(
            report.algorithms(),
            vec![Algorithm::Xmss, Algorithm::SlhDsa, Algorithm::Legacy]
        );
    }

    #[test]
    fn test_changing_one_path_leaves_others_alone() {
        let standard = derive_all(&abandon_art(), "", &PathTable::standard()).unwrap();
        let table = PathTable::standard().with_path(Algorithm::Legacy, "m/44'/60'/1'/0/0");
        let moved = derive_all(&abandon_art(), "", &table).unwrap();

        assert_eq!(
            seed_hex(&moved, Algorithm::Legacy),
            "b4538ac1ed7b1a256f87e483ca9e4eff66ca499b9101cb52cdd01ba360057bcc"
        );
        for algorithm in Algorithm::ALL.into_iter().filter(|a| *a != Algorithm::Legacy) {
            assert_eq!(seed_hex(&moved, algorithm), seed_hex(&standard, algorithm));
        }
    }

    #[test]
    fn test_root_path_yields_master_key() {
        let seed = stretch_phrase(&abandon_art().join(" "), "").unwrap();
        let record = derive_one(&seed, Algorithm::Falcon, "m").unwrap();
        assert_eq!(
            record.seed().expose_hex().as_str(),
            "235b34cd7c9f6d7e4595ffe9ae4b1cb5606df8aca2b527d20a07c8f56b2342f4"
        );
    }

    #[test]
    fn test_derive_one_matches_table_run() {
        let seed = stretch_phrase(&abandon_art().join(" "), "").unwrap();
        let report = derive_all_from_seed(&seed, &PathTable::standard(), AddressStyle::Lowercase)
            .unwrap();
        let single = derive_one(&seed, Algorithm::Legacy, "m/44'/60'/0'/0/0").unwrap();
        assert_eq!(&single, report.get(Algorithm::Legacy).unwrap());
    }

    #[test]
    fn test_bad_path_fails_whole_run_with_context() {
        let table = PathTable::standard().with_path(Algorithm::MlDsa, "m/abc");
        let err = derive_all(&abandon_art(), "", &table).unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidPath);
        assert_eq!(err.details.as_deref(), Some("algorithm=ml_dsa path=m/abc"));
    }

    #[test]
    fn test_invalid_mnemonic_produces_nothing() {
        let mut words = abandon_art();
        words[23] = "abandon";
        let err = derive_all(&words, "", &PathTable::standard()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMnemonic);
        assert!(!err.to_string().contains("abandon"));
    }

    #[test]
    fn test_twelve_word_mnemonic() {
        let mut words = vec!["abandon"; 11];
        words.push("about");
        let report = derive_all(&words, "", &PathTable::standard()).unwrap();
        let legacy = report.get(Algorithm::Legacy).unwrap();
        assert_eq!(
            legacy.seed().expose_hex().as_str(),
            "1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );
        assert_eq!(legacy.address(), Some("0x9858effd232b4033e47d90003d41ec34ecaeda94"));
    }
}
