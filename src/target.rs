use crate::error::{CrackError, Result};

/// Salt prefix length of the reference `$6$XX$` stored digests.
pub const DEFAULT_SALT_LEN: usize = 6;

/// A stored digest split into the salt handed to the oracle and the full
/// string every oracle result is compared against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetRecord {
    stored: String,
    salt_len: usize,
}

impl TargetRecord {
    pub fn parse(stored: impl Into<String>, salt_len: usize) -> Result<Self> {
        let stored = stored.into();

        if stored.len() < salt_len {
            return Err(CrackError::config(format!(
                "stored digest '{stored}' is shorter than the {salt_len} byte salt"
            )));
        }
        if !stored.is_char_boundary(salt_len) {
            return Err(CrackError::config(format!(
                "salt prefix of '{stored}' splits a character"
            )));
        }

        Ok(Self { stored, salt_len })
    }

    pub fn salt(&self) -> &str {
        &self.stored[..self.salt_len]
    }

    /// The stored string itself; oracle output embeds the salt so the two
    /// compare directly.
    pub fn expected(&self) -> &str {
        &self.stored
    }
}

#[cfg(test)]
mod test {
    use super::{TargetRecord, DEFAULT_SALT_LEN};
    use crate::error::CrackError;

    #[test]
    fn salt_is_prefix() {
        let record = TargetRecord::parse("$6$KB$UE9sg8u7cP9yh3OR", DEFAULT_SALT_LEN).unwrap();

        assert_eq!(record.salt(), "$6$KB$");
        assert_eq!(record.expected(), "$6$KB$UE9sg8u7cP9yh3OR");
    }

    #[test]
    fn too_short() {
        assert!(matches!(
            TargetRecord::parse("$6$K", DEFAULT_SALT_LEN),
            Err(CrackError::Configuration(_))
        ));
    }

    #[test]
    fn salt_must_end_on_char_boundary() {
        assert!(matches!(
            TargetRecord::parse("$6$Kéxyz", 5),
            Err(CrackError::Configuration(_))
        ));
    }
}
