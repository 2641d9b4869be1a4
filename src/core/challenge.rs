use rand::Rng;

use super::error::{ErrorKind, ValidationError};

const FIELD: &str = "captcha";

/// Arithmetic human-verification challenge: "what is `a + b`?".
///
/// Owned by a form session and re-issued on every reset; not a real
/// bot-resistance mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    left: u8,
    right: u8,
}

impl Challenge {
    /// Challenge with fixed operands (each 0..=9).
    pub fn new(left: u8, right: u8) -> Self {
        Self {
            left: left.min(9),
            right: right.min(9),
        }
    }

    /// Fresh challenge with two random single-digit operands.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            left: rng.gen_range(0..10),
            right: rng.gen_range(0..10),
        }
    }

    /// Fresh challenge from the thread-local RNG.
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    pub fn operands(&self) -> (u8, u8) {
        (self.left, self.right)
    }

    pub fn expected(&self) -> i64 {
        i64::from(self.left) + i64::from(self.right)
    }

    /// Prompt shown next to the answer field.
    pub fn prompt(&self) -> String {
        format!("{} + {} = ?", self.left, self.right)
    }

    /// Check a typed answer, compared as an integer.
    pub fn check(&self, answer: &str) -> Result<(), ValidationError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ValidationError::required(FIELD));
        }
        match answer.parse::<i64>() {
            Ok(n) if n == self.expected() => Ok(()),
            _ => Err(ValidationError::new(
                FIELD,
                "incorrect answer",
                ErrorKind::ChallengeIncorrect,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn correct_answer_passes() {
        let c = Challenge::new(3, 5);
        assert!(c.check("8").is_ok());
        assert!(c.check(" 8 ").is_ok());
    }

    #[test]
    fn wrong_answer_fails() {
        let c = Challenge::new(3, 5);
        assert_eq!(c.check("7").unwrap_err().kind, ErrorKind::ChallengeIncorrect);
        assert_eq!(c.check("8.0").unwrap_err().kind, ErrorKind::ChallengeIncorrect);
        assert_eq!(c.check("ocho").unwrap_err().kind, ErrorKind::ChallengeIncorrect);
    }

    #[test]
    fn empty_answer_is_required() {
        let c = Challenge::new(3, 5);
        assert_eq!(c.check("").unwrap_err().kind, ErrorKind::FieldRequired);
        assert_eq!(c.check("   ").unwrap_err().kind, ErrorKind::FieldRequired);
    }

    #[test]
    fn operands_are_single_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (a, b) = Challenge::generate(&mut rng).operands();
            assert!(a <= 9 && b <= 9);
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = Challenge::generate(&mut StdRng::seed_from_u64(42));
        let b = Challenge::generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_format() {
        assert_eq!(Challenge::new(3, 5).prompt(), "3 + 5 = ?");
    }
}
