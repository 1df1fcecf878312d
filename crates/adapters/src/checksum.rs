//! SHA-256 artifact verification.

use foundation_ports::ChecksumVerifier;
use foundation_shared::{ErrorEnvelope, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Verifies artifacts against a hex-encoded SHA-256 digest.
///
/// An optional `sha256:` prefix on the expected value is accepted and hex
/// comparison ignores case.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ChecksumVerifier;

impl Sha256ChecksumVerifier {
    /// Hex digest of the file at `path`.
    pub fn digest_file(path: &Path) -> Result<String> {
        let mut file = File::open(path).map_err(|error| {
            ErrorEnvelope::from(error).with_metadata("path", path.display().to_string())
        })?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0_u8; READ_CHUNK_BYTES];
        loop {
            let read = file.read(&mut buffer).map_err(ErrorEnvelope::from)?;
            if read == 0 {
                break;
            }
            hasher.update(buffer.get(..read).unwrap_or_default());
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl ChecksumVerifier for Sha256ChecksumVerifier {
    fn verify_checksum(&self, path: &Path, checksum: &str) -> Result<bool> {
        let expected = checksum.trim();
        let expected = expected.strip_prefix("sha256:").unwrap_or(expected);
        let actual = Self::digest_file(path)?;
        Ok(actual.eq_ignore_ascii_case(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation_shared::ErrorCode;
    use std::path::PathBuf;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn temp_artifact(name: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
        let dir = std::env::temp_dir().join(format!("foundation-checksum-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    #[test]
    fn verifies_hex_digest_with_optional_prefix() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let path = temp_artifact("hello.bin", b"hello")?;
        let verifier = Sha256ChecksumVerifier;

        assert!(verifier.verify_checksum(&path, HELLO_SHA256)?);
        assert!(verifier.verify_checksum(&path, &format!("sha256:{}", HELLO_SHA256.to_uppercase()))?);
        assert!(!verifier.verify_checksum(&path, "00")?);

        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let missing = std::env::temp_dir().join("foundation-checksum-missing.bin");
        let error = Sha256ChecksumVerifier.verify_checksum(&missing, HELLO_SHA256).err();
        assert_eq!(error.map(|error| error.code), Some(ErrorCode::not_found()));
    }
}
