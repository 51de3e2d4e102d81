//! Reveal tokens.
//!
//! A token is 80 bits from the operating system CSPRNG written as 16
//! Crockford base32 characters.

use super::ExchangeError;
use ring::rand::{SecureRandom, SystemRandom};

const TOKEN_BYTES: usize = 10;

/// Length of every issued token, in characters.
pub const TOKEN_LEN: usize = TOKEN_BYTES * 8 / 5;

pub fn issue_reveal_token(rng: &SystemRandom) -> Result<String, ExchangeError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes).map_err(|_| ExchangeError::Entropy)?;
    Ok(fast32::base32::CROCKFORD.encode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let rng = SystemRandom::new();
        let token = issue_reveal_token(&rng).unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert!(!token.contains(['I', 'L', 'O', 'U']));
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let rng = SystemRandom::new();
        let tokens: HashSet<String> = (0..1000)
            .map(|_| issue_reveal_token(&rng).unwrap())
            .collect();
        assert_eq!(tokens.len(), 1000);
    }
}
