//! The one-way hash consulted for every candidate.

use sha_crypt::{sha512_crypt_b64, Sha512Params};

use crate::error::{CrackError, Result};

/// Hashes a plaintext under a salt setting and returns the full stored form.
///
/// The returned string must be directly comparable to a stored digest, so
/// implementations embed the salt in their output the way crypt(3) does.
pub trait HashOracle {
    fn hash(&self, plaintext: &str, salt: &str) -> Result<String>;
}

impl<F> HashOracle for F
where
    F: Fn(&str, &str) -> Result<String>,
{
    fn hash(&self, plaintext: &str, salt: &str) -> Result<String> {
        self(plaintext, salt)
    }
}

const PREFIX: &str = "$6$";
const ROUNDS_PREFIX: &str = "rounds=";
const ROUNDS_DEFAULT: usize = 5_000;
const ROUNDS_MIN: usize = 1_000;
const ROUNDS_MAX: usize = 999_999_999;
const SALT_MAX_LEN: usize = 16;

/// crypt(3) SHA-512 scheme, settings of the form `$6$[rounds=N$]salt[$...]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha512Crypt;

struct Setting<'a> {
    /// Explicit rounds are echoed back in the output, defaults are not.
    rounds: Option<usize>,
    salt: &'a str,
}

impl<'a> Setting<'a> {
    fn parse(setting: &'a str) -> Result<Self> {
        let rest = setting
            .strip_prefix(PREFIX)
            .ok_or_else(|| CrackError::oracle(setting, "expected a '$6$' setting"))?;

        let (rounds, rest) = match rest.strip_prefix(ROUNDS_PREFIX) {
            Some(spec) => {
                let (digits, tail) = spec
                    .split_once('$')
                    .ok_or_else(|| CrackError::oracle(setting, "unterminated rounds field"))?;
                let rounds: usize = digits
                    .parse()
                    .map_err(|_| CrackError::oracle(setting, "rounds is not a number"))?;
                if !(ROUNDS_MIN..=ROUNDS_MAX).contains(&rounds) {
                    return Err(CrackError::oracle(
                        setting,
                        format!("rounds must be within {ROUNDS_MIN}..={ROUNDS_MAX}"),
                    ));
                }
                (Some(rounds), tail)
            }
            None => (None, rest),
        };

        let salt = rest.split('$').next().unwrap_or_default();
        let salt = if salt.len() > SALT_MAX_LEN {
            salt.get(..SALT_MAX_LEN)
                .ok_or_else(|| CrackError::oracle(setting, "salt is not ASCII"))?
        } else {
            salt
        };

        Ok(Self { rounds, salt })
    }
}

impl HashOracle for Sha512Crypt {
    fn hash(&self, plaintext: &str, salt: &str) -> Result<String> {
        let setting = Setting::parse(salt)?;
        let params = Sha512Params::new(setting.rounds.unwrap_or(ROUNDS_DEFAULT))
            .map_err(|e| CrackError::oracle(salt, format!("{e:?}")))?;
        let digest = sha512_crypt_b64(plaintext.as_bytes(), setting.salt.as_bytes(), &params)
            .map_err(|e| CrackError::oracle(salt, format!("{e:?}")))?;

        Ok(match setting.rounds {
            Some(rounds) => format!("{PREFIX}{ROUNDS_PREFIX}{rounds}${}${digest}", setting.salt),
            None => format!("{PREFIX}{}${digest}", setting.salt),
        })
    }
}

#[cfg(test)]
mod test {
    use super::{HashOracle, Sha512Crypt};
    use crate::error::CrackError;

    #[test]
    fn compute_hash() {
        let digest = Sha512Crypt.hash("Hello world!", "$6$saltstring").unwrap();

        assert_eq!(
            digest,
            "$6$saltstring$svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1"
        );
    }

    #[test]
    fn stored_digest_is_a_valid_setting() {
        let stored = Sha512Crypt.hash("ABC12", "$6$KB$").unwrap();

        assert!(stored.starts_with("$6$KB$"));
        assert_eq!(stored.len(), "$6$KB$".len() + 86);
        assert_eq!(Sha512Crypt.hash("ABC12", &stored).unwrap(), stored);
        assert_ne!(Sha512Crypt.hash("ABC13", &stored).unwrap(), stored);
    }

    #[test]
    fn long_salt_is_truncated() {
        let digest = Sha512Crypt
            .hash("pw", "$6$0123456789abcdefXYZ$")
            .unwrap();

        assert!(digest.starts_with("$6$0123456789abcdef$"));
    }

    #[test]
    fn explicit_rounds_are_echoed() {
        let digest = Sha512Crypt.hash("pw", "$6$rounds=1000$KB$").unwrap();

        assert!(digest.starts_with("$6$rounds=1000$KB$"));
        assert_ne!(digest, Sha512Crypt.hash("pw", "$6$KB$").unwrap());
    }

    #[test]
    fn malformed_salt_fails() {
        for salt in ["KB", "$1$KB$", "$6$rounds=abc$KB$", "$6$rounds=10$KB$", "$6$rounds=5000"] {
            assert!(
                matches!(Sha512Crypt.hash("pw", salt), Err(CrackError::Oracle { .. })),
                "{salt} should be rejected"
            );
        }
    }

    #[test]
    fn closures_are_oracles() {
        let oracle = |plain: &str, salt: &str| -> crate::error::Result<String> {
            Ok(format!("{salt}{plain}"))
        };

        assert_eq!(oracle.hash("AB", "$x$").unwrap(), "$x$AB");
    }
}
