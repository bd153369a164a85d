//! Snapshot and container verification: SHA-512 digests and detached GPG
//! signatures.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha512};
use thiserror::Error;
use tracing::warn;

/// Errors from checksum or signature verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Local filesystem failure while reading the file under test.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file's digest does not match the published one. Both digests are
    /// carried so the failure is attributable.
    #[error("SHA-512 mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// File that failed verification.
        path: String,
        /// Digest the snapshot metadata promised.
        expected: String,
        /// Digest actually computed.
        actual: String,
    },

    /// gpg exited unsuccessfully for the detached signature.
    #[error("GPG rejected signature {signature} for {file}")]
    BadSignature {
        /// File whose signature failed.
        file: String,
        /// The `.asc` detached signature.
        signature: String,
    },

    /// gpg has no key that can check the signature; the signing key was
    /// never imported into the keyring. Distinct from [`Self::BadSignature`]
    /// so a provisioning gap is not reported as a forgery.
    #[error("no key in the gpg keyring for {signature}; signing key not imported")]
    MissingKey {
        /// The `.asc` detached signature.
        signature: String,
    },

    /// gpg could not import the signing key.
    #[error("gpg could not import signing key {key}")]
    KeyImport {
        /// Path of the key file handed to `gpg --import`.
        key: String,
    },
}

/// Outcome of a signature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// gpg accepted the signature.
    Verified,
    /// No gpg binary on PATH; verification was skipped with a warning.
    Skipped,
}

/// Computes the hex SHA-512 digest of a file, streaming in fixed-size
/// chunks.
///
/// # Errors
///
/// Fails when the file cannot be opened or read.
pub fn sha512_file(path: &Path) -> Result<String, VerifyError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha512::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Verifies a file against an expected hex SHA-512 digest.
///
/// # Errors
///
/// Returns [`VerifyError::ChecksumMismatch`] carrying both digests when
/// they disagree.
pub fn verify_sha512(path: &Path, expected: &str) -> Result<(), VerifyError> {
    let actual = sha512_file(path)?;
    if actual != expected {
        return Err(VerifyError::ChecksumMismatch {
            path: path.display().to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// True when a `gpg` binary is on PATH.
pub fn gpg_available() -> bool {
    which::which("gpg").is_ok()
}

/// Imports a signing key into the local gpg keyring so that a later
/// [`verify_signature`] can succeed on a fresh host.
///
/// # Errors
///
/// Returns [`VerifyError::KeyImport`] when gpg rejects the key file, or an
/// IO error when gpg cannot be spawned.
pub async fn import_key(key: &Path) -> Result<(), VerifyError> {
    let status = tokio::process::Command::new("gpg")
        .arg("--import")
        .arg(key)
        .status()
        .await?;
    if status.success() {
        Ok(())
    } else {
        Err(VerifyError::KeyImport {
            key: key.display().to_string(),
        })
    }
}

/// Verifies a detached GPG signature via the system `gpg` binary.
///
/// When no `gpg` is on PATH the check is skipped with a warning rather than
/// failing the run; the SHA-512 comparison still guards the snapshot.
///
/// # Errors
///
/// Returns [`VerifyError::MissingKey`] when the keyring has no key for the
/// signature and [`VerifyError::BadSignature`] when gpg rejects it outright.
pub async fn verify_signature(file: &Path, signature: &Path) -> Result<SignatureCheck, VerifyError> {
    if !gpg_available() {
        warn!("can't find gpg, skipping signature verification");
        return Ok(SignatureCheck::Skipped);
    }
    let output = tokio::process::Command::new("gpg")
        .arg("--verify")
        .arg(signature)
        .arg(file)
        .output()
        .await?;
    if output.status.success() {
        Ok(SignatureCheck::Verified)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(signature_failure(&stderr, file, signature))
    }
}

/// gpg exits nonzero both for a forged signature and for a key it has never
/// seen; only the stderr text tells the two apart.
fn signature_failure(stderr: &str, file: &Path, signature: &Path) -> VerifyError {
    if stderr.contains("No public key") {
        VerifyError::MissingKey {
            signature: signature.display().to_string(),
        }
    } else {
        VerifyError::BadSignature {
            file: file.display().to_string(),
            signature: signature.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST test vector for SHA-512("abc").
    const ABC_SHA512: &str = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                              2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";

    #[test]
    fn digest_matches_known_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc");
        std::fs::write(&path, "abc").unwrap();
        assert_eq!(sha512_file(&path).unwrap(), ABC_SHA512);
    }

    #[test]
    fn matching_digest_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc");
        std::fs::write(&path, "abc").unwrap();
        verify_sha512(&path, ABC_SHA512).unwrap();
    }

    #[test]
    fn mismatch_names_both_digests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc");
        std::fs::write(&path, "not abc").unwrap();
        let err = verify_sha512(&path, ABC_SHA512).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expected"));
        assert!(message.contains(ABC_SHA512));
    }

    #[test]
    fn absent_key_is_not_reported_as_a_forgery() {
        let stderr = "gpg: Signature made Tue 26 Aug 2025\n\
                      gpg: Can't check signature: No public key\n";
        let err = signature_failure(
            stderr,
            Path::new("texlive.tlpdb.sha512"),
            Path::new("texlive.tlpdb.sha512.asc"),
        );
        assert!(matches!(err, VerifyError::MissingKey { .. }));
        assert!(err.to_string().contains("signing key not imported"));
    }

    #[test]
    fn rejected_signature_stays_a_bad_signature() {
        let stderr = "gpg: BAD signature from \"TeX Live Distribution <tex-live@tug.org>\"\n";
        let err = signature_failure(
            stderr,
            Path::new("texlive.tlpdb.sha512"),
            Path::new("texlive.tlpdb.sha512.asc"),
        );
        assert!(matches!(err, VerifyError::BadSignature { .. }));
    }
}
