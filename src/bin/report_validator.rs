use pq_seed::wallet::{derive_address, derive_checksum_address};
use pq_seed::{parse_path, AlgorithmSeedRecord, SeedReport, SEED_BITS};
use secp256k1::Secp256k1;
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read};

struct ValidationResult {
    name: String,
    success: bool,
    message: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let payload = if let Some(path) = args.get(1) {
        fs::read_to_string(path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let report: SeedReport = serde_json::from_str(&payload)?;
    if report.is_empty() {
        return Err("report contains no records".into());
    }

    let results: Vec<ValidationResult> = report
        .iter()
        .map(|record| run_validation(record.algorithm().id(), || validate_record(record)))
        .collect();

    println!("================ Seed Report Validation ================");
    for result in &results {
        let status = if result.success {
            "✅ PASS"
        } else {
            "❌ FAIL"
        };
        println!("{:<10} {}", result.name, status);
        if !result.success {
            println!("    {}", result.message);
        }
    }

    let overall_success = results.iter().all(|r| r.success);
    println!("========================================================");
    if overall_success {
        println!("Overall status: ✅ All derived seeds verified");
        Ok(())
    } else {
        println!("Overall status: ❌ Validation failed");
        Err("seed report validation failed".into())
    }
}

fn run_validation<F>(name: &str, f: F) -> ValidationResult
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(_) => ValidationResult {
            name: name.to_string(),
            success: true,
            message: String::new(),
        },
        Err(err) => ValidationResult {
            name: name.to_string(),
            success: false,
            message: err,
        },
    }
}

fn validate_record(record: &AlgorithmSeedRecord) -> Result<(), String> {
    if record.seed_length() != SEED_BITS {
        return Err(format!(
            "seed_length is {}, expected {}",
            record.seed_length(),
            SEED_BITS
        ));
    }

    parse_path(record.path()).map_err(|e| format!("path {}: {}", record.path(), e))?;

    if record.usage() != &record.algorithm().usage() {
        return Err(format!(
            "usage metadata does not describe {} (found {})",
            record.algorithm(),
            record.usage().algorithm()
        ));
    }

    match (record.algorithm().attaches_address(), record.address()) {
        (true, Some(address)) => validate_address(record, address),
        (true, None) => Err("address missing".to_string()),
        (false, Some(_)) => Err("unexpected address on a post-quantum record".to_string()),
        (false, None) => Ok(()),
    }
}

fn validate_address(record: &AlgorithmSeedRecord, address: &str) -> Result<(), String> {
    let secp = Secp256k1::new();
    let seed = record.seed().expose();

    let lowercase = derive_address(&secp, seed).map_err(|e| e.to_string())?;
    if address == lowercase {
        return Ok(());
    }

    let checksum = derive_checksum_address(&secp, seed).map_err(|e| e.to_string())?;
    if address == checksum {
        return Ok(());
    }

    if address.to_lowercase() == lowercase {
        Err("address checksum casing is invalid".to_string())
    } else {
        Err("address does not match seed".to_string())
    }
}
