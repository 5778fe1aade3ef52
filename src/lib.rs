pub mod bench;
pub mod fixtures;
pub mod report;
pub mod timer;

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use bench::{measure, run_pass, warm_up, BenchConfig};
use fixtures::{FixtureGenerator, FixtureGroup, DEFAULT_SIZES, EXTENDED_SIZES};
use hash_tools::{CandidateModule, HashFunction, Profile};
use report::{AggregateResult, ReportPrinter};
use timer::{Clock, MonotonicClock};

pub mod hash_tools {
    use std::fmt;

    use anyhow::Result;
    use clap::ValueEnum;
    use openssl::hash::{hash, MessageDigest};
    use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY, SHA256, SHA512};
    use serde::Serialize;
    use sha1::Sha1;
    use sha2::{Digest, Sha256, Sha512};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum HashFunction {
        Sha1,
        Sha256,
        Sha512,
        Md5,
    }

    impl HashFunction {
        pub fn as_str(&self) -> &'static str {
            match self {
                HashFunction::Sha1 => "sha1",
                HashFunction::Sha256 => "sha256",
                HashFunction::Sha512 => "sha512",
                HashFunction::Md5 => "md5",
            }
        }
    }

    impl fmt::Display for HashFunction {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// One-shot digest of a buffer.
    pub type DigestFn = fn(&[u8]) -> Result<Vec<u8>>;

    /// A named backend and the functions it offers, in declaration order.
    pub struct CandidateModule {
        pub name: String,
        pub functions: Vec<(HashFunction, DigestFn)>,
    }

    impl CandidateModule {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                functions: Vec::new(),
            }
        }

        pub fn with(mut self, function: HashFunction, digest_fn: DigestFn) -> Self {
            self.functions.push((function, digest_fn));
            self
        }

        pub fn function(&self, function: HashFunction) -> Option<DigestFn> {
            self.functions
                .iter()
                .find(|(f, _)| *f == function)
                .map(|(_, digest_fn)| *digest_fn)
        }

        pub fn function_names(&self) -> Vec<HashFunction> {
            self.functions.iter().map(|(f, _)| *f).collect()
        }
    }

    /// Execution environment; decides which backends are registered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum Profile {
        /// Pure Rust and system OpenSSL
        Native,
        /// Pure Rust and ring, no system libraries
        Portable,
    }

    fn rust_crypto_sha1(data: &[u8]) -> Result<Vec<u8>> {
        Ok(Sha1::digest(data).to_vec())
    }

    fn rust_crypto_sha256(data: &[u8]) -> Result<Vec<u8>> {
        Ok(Sha256::digest(data).to_vec())
    }

    fn rust_crypto_sha512(data: &[u8]) -> Result<Vec<u8>> {
        Ok(Sha512::digest(data).to_vec())
    }

    fn rust_crypto_md5(data: &[u8]) -> Result<Vec<u8>> {
        Ok(md5::compute(data).0.to_vec())
    }

    fn openssl_hash(algorithm: MessageDigest, data: &[u8]) -> Result<Vec<u8>> {
        let bytes = hash(algorithm, data)?;
        Ok(bytes.to_vec())
    }

    fn openssl_sha1(data: &[u8]) -> Result<Vec<u8>> {
        openssl_hash(MessageDigest::sha1(), data)
    }

    fn openssl_sha256(data: &[u8]) -> Result<Vec<u8>> {
        openssl_hash(MessageDigest::sha256(), data)
    }

    fn openssl_sha512(data: &[u8]) -> Result<Vec<u8>> {
        openssl_hash(MessageDigest::sha512(), data)
    }

    fn openssl_md5(data: &[u8]) -> Result<Vec<u8>> {
        openssl_hash(MessageDigest::md5(), data)
    }

    fn ring_sha1(data: &[u8]) -> Result<Vec<u8>> {
        Ok(digest(&SHA1_FOR_LEGACY_USE_ONLY, data).as_ref().to_vec())
    }

    fn ring_sha256(data: &[u8]) -> Result<Vec<u8>> {
        Ok(digest(&SHA256, data).as_ref().to_vec())
    }

    fn ring_sha512(data: &[u8]) -> Result<Vec<u8>> {
        Ok(digest(&SHA512, data).as_ref().to_vec())
    }

    /// sha-1, sha2 and md5 crates
    pub fn rust_crypto_candidate() -> CandidateModule {
        CandidateModule::new("rustCrypto")
            .with(HashFunction::Sha1, rust_crypto_sha1)
            .with(HashFunction::Sha256, rust_crypto_sha256)
            .with(HashFunction::Sha512, rust_crypto_sha512)
            .with(HashFunction::Md5, rust_crypto_md5)
    }

    /// EVP digests through the openssl bindings
    pub fn openssl_candidate() -> CandidateModule {
        CandidateModule::new("openssl")
            .with(HashFunction::Sha1, openssl_sha1)
            .with(HashFunction::Sha256, openssl_sha256)
            .with(HashFunction::Sha512, openssl_sha512)
            .with(HashFunction::Md5, openssl_md5)
    }

    /// ring has no MD5
    pub fn ring_candidate() -> CandidateModule {
        CandidateModule::new("ring")
            .with(HashFunction::Sha1, ring_sha1)
            .with(HashFunction::Sha256, ring_sha256)
            .with(HashFunction::Sha512, ring_sha512)
    }

    /// Candidates for `profile`. The first entry defines the functions to run.
    pub fn registry(profile: Profile) -> Vec<CandidateModule> {
        let mut modules = vec![rust_crypto_candidate()];
        match profile {
            Profile::Native => modules.push(openssl_candidate()),
            Profile::Portable => modules.push(ring_candidate()),
        }
        modules
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const HELLO: &[u8] = b"hello";

        fn hex_digest(module: &CandidateModule, function: HashFunction) -> Option<String> {
            module
                .function(function)
                .map(|f| hex::encode(f(HELLO).unwrap()))
        }

        #[test]
        fn test_backends_agree_on_known_vectors() {
            let vectors = [
                (HashFunction::Sha1, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"),
                (
                    HashFunction::Sha256,
                    "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
                ),
                (HashFunction::Md5, "5d41402abc4b2a76b9719d911017c592"),
            ];

            let modules = [
                rust_crypto_candidate(),
                openssl_candidate(),
                ring_candidate(),
            ];
            for module in modules {
                for (function, expected) in vectors {
                    if let Some(actual) = hex_digest(&module, function) {
                        assert_eq!(actual, expected, "{} {}", module.name, function);
                    }
                }
            }
        }

        #[test]
        fn test_sha512_lengths_match() {
            let digests: Vec<Vec<u8>> = [
                rust_crypto_candidate(),
                openssl_candidate(),
                ring_candidate(),
            ]
            .iter()
            .map(|module| {
                let sha512 = module.function(HashFunction::Sha512).unwrap();
                sha512(HELLO).unwrap()
            })
            .collect();

            assert!(digests.iter().all(|d| d.len() == 64));
            assert_eq!(digests[0], digests[1]);
            assert_eq!(digests[0], digests[2]);
        }

        #[test]
        fn test_ring_lacks_md5() {
            assert!(ring_candidate().function(HashFunction::Md5).is_none());
            assert!(openssl_candidate().function(HashFunction::Md5).is_some());
        }

        #[test]
        fn test_registry_profiles() {
            let native: Vec<String> = registry(Profile::Native)
                .into_iter()
                .map(|m| m.name)
                .collect();
            assert_eq!(native, vec!["rustCrypto", "openssl"]);

            let portable: Vec<String> = registry(Profile::Portable)
                .into_iter()
                .map(|m| m.name)
                .collect();
            assert_eq!(portable, vec!["rustCrypto", "ring"]);
        }

        #[test]
        fn test_function_order_follows_declaration() {
            assert_eq!(
                rust_crypto_candidate().function_names(),
                vec![
                    HashFunction::Sha1,
                    HashFunction::Sha256,
                    HashFunction::Sha512,
                    HashFunction::Md5
                ]
            );
        }
    }
}

/// Digest backend benchmark
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Environment profile selecting the candidate backends
    #[arg(long, value_enum, default_value_t = Profile::Native)]
    pub profile: Profile,

    /// Warm-up budget per candidate, in milliseconds
    #[arg(long, default_value_t = 15.0)]
    pub warmup_ms: f64,

    /// Measurement budget per candidate, in milliseconds
    #[arg(long, default_value_t = 50.0)]
    pub measure_ms: f64,

    /// Benchmark the extended fixture sizes (100 B up to 1 MB)
    #[arg(long)]
    pub all_sizes: bool,

    /// Also write the results as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Result of one (function, fixture group, candidate) triple.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteRecord {
    pub function: HashFunction,
    pub size: usize,
    pub count: usize,
    pub candidate: String,
    pub mean_ns_per_op: f64,
    pub error_pct: f64,
    pub samples: usize,
}

/// Benchmarks every function of the first candidate, over every fixture group,
/// against every candidate, printing the report to `out`.
///
/// Candidates lacking a function are skipped for it.
pub fn run_suite<C, W>(
    clock: &C,
    modules: &[CandidateModule],
    groups: &[FixtureGroup],
    config: &BenchConfig,
    out: W,
) -> Result<Vec<SuiteRecord>>
where
    C: Clock,
    W: Write,
{
    let mut records = Vec::new();
    let Some(first) = modules.first() else {
        return Ok(records);
    };

    let mut printer = ReportPrinter::new(out);
    for function in first.function_names() {
        for group in groups {
            printer.begin_block(function.as_str(), group.size)?;

            let mut results = Vec::new();
            for module in modules {
                let Some(digest_fn) = module.function(function) else {
                    debug!(
                        candidate = %module.name,
                        %function,
                        "function not provided, skipping"
                    );
                    continue;
                };

                let bench = || run_pass(digest_fn, &group.buffers);
                warm_up(clock, config.warmup_ms, bench)?;
                let measurement = measure(clock, config.measure_ms, bench)?;

                let result = AggregateResult {
                    name: module.name.clone(),
                    mean_ns_per_op: measurement.mean_ns_per_op,
                    error_pct: measurement.error_pct,
                };
                printer.result(&result)?;

                records.push(SuiteRecord {
                    function,
                    size: group.size,
                    count: group.buffers.len(),
                    candidate: module.name.clone(),
                    mean_ns_per_op: measurement.mean_ns_per_op,
                    error_pct: measurement.error_pct,
                    samples: measurement.samples.len(),
                });
                results.push(result);
            }

            printer.end_block(&results)?;
        }
    }

    Ok(records)
}

pub fn write_results_to_json(records: &[SuiteRecord], output_file: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let mut file = File::create(output_file)
        .with_context(|| format!("Failed to create {}", output_file.display()))?;
    file.write_all(json.as_bytes())?;

    Ok(())
}

pub fn run(args: Args) -> Result<()> {
    ensure!(
        args.warmup_ms.is_finite() && args.measure_ms.is_finite(),
        "Budgets must be finite numbers"
    );
    let config = BenchConfig {
        warmup_ms: args.warmup_ms,
        measure_ms: args.measure_ms,
    };

    let modules = hash_tools::registry(args.profile);
    info!(
        profile = ?args.profile,
        candidates = ?modules.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        "registered candidates"
    );

    let table: &[(usize, usize)] = if args.all_sizes {
        &EXTENDED_SIZES
    } else {
        &DEFAULT_SIZES
    };
    let mut generator = FixtureGenerator::with_default_seed()?;
    let groups = generator.generate_all(table);

    let stdout = std::io::stdout();
    let records = run_suite(&MonotonicClock, &modules, &groups, &config, stdout.lock())?;

    if let Some(path) = &args.output {
        write_results_to_json(&records, path)?;
        info!(path = %path.display(), records = records.len(), "results written");
    }

    Ok(())
}
