//! Implementation of prime field ops using modular arithmetic.

use crate::errors::IKKCryptoError;

use super::is_prime;

use num_integer::Integer;
use serde::{Deserialize, Serialize};

/// Represents the prime field GF(q) = Z/qZ.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub modulus: u64,
}

impl Default for Field {
    fn default() -> Self {
        Field { modulus: 2 }
    }
}

impl Field {
    /// Create a new Field with the given order.
    ///
    /// The order must be a prime that fits in an `i64`.
    pub fn try_with(modulus: u64) -> Result<Self, IKKCryptoError> {
        if i64::try_from(modulus).is_err() {
            return Err(IKKCryptoError::InvalidModulus(format!(
                "Field order {} does not fit in i64",
                modulus
            )));
        }

        if !is_prime(modulus) {
            return Err(IKKCryptoError::InvalidModulus(format!(
                "Field order must be a prime, got {}",
                modulus
            )));
        }

        Ok(Field { modulus })
    }

    /// Returns the order of the field.
    ///
    /// # Example
    ///
    /// ```
    /// # use ikk_crypto::field::Field;
    /// let field = Field::try_with(13).unwrap();
    /// assert_eq!(field.modulus(), 13);
    /// ```
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Normalizes a value to be within the range `[0, modulus - 1]`.
    ///
    /// Handles negative values correctly by adding the modulus.
    ///
    /// # Example
    ///
    /// ```
    /// # use ikk_crypto::field::Field;
    /// let field = Field::try_with(11).unwrap();
    /// assert_eq!(field.normalize(15), 4);
    /// assert_eq!(field.normalize(-3), 8);
    /// assert_eq!(field.normalize(11), 0);
    /// ```
    pub fn normalize(&self, value: i64) -> i64 {
        value.rem_euclid(self.modulus as i64)
    }

    /// Computes `(a + b) mod q`.
    ///
    /// # Example
    ///
    /// ```
    /// # use ikk_crypto::field::Field;
    /// let field = Field::try_with(2).unwrap();
    /// assert_eq!(field.add(1, 1), 0);
    /// assert_eq!(field.add(1, 0), 1);
    /// ```
    pub fn add(&self, a: i64, b: i64) -> i64 {
        let a_norm = self.normalize(a) as i128;
        let b_norm = self.normalize(b) as i128;

        ((a_norm + b_norm) % self.modulus as i128) as i64
    }

    /// Computes `(a - b) mod q`.
    ///
    /// # Example
    ///
    /// ```
    /// # use ikk_crypto::field::Field;
    /// let field = Field::try_with(7).unwrap();
    /// assert_eq!(field.sub(3, 5), 5);
    /// assert_eq!(field.sub(-2, 3), 2);
    /// ```
    pub fn sub(&self, a: i64, b: i64) -> i64 {
        let a_norm = self.normalize(a) as i128;
        let b_norm = self.normalize(b) as i128;

        (a_norm - b_norm).rem_euclid(self.modulus as i128) as i64
    }

    /// Computes `(a * b) mod q`.
    ///
    /// Uses `i128` internally to prevent overflow during multiplication before the modulo operation.
    ///
    /// # Example
    ///
    /// ```
    /// # use ikk_crypto::field::Field;
    /// let field = Field::try_with(11).unwrap();
    /// assert_eq!(field.mul(7, 5), 2); // 35 mod 11 = 2
    /// assert_eq!(field.mul(-2, 6), 10); // -12 mod 11 = 10
    /// ```
    pub fn mul(&self, a: i64, b: i64) -> i64 {
        let a_norm = self.normalize(a) as i128;
        let b_norm = self.normalize(b) as i128;

        ((a_norm * b_norm) % self.modulus as i128) as i64
    }

    /// Computes the additive inverse `-a mod q`.
    ///
    /// # Example
    ///
    /// ```
    /// # use ikk_crypto::field::Field;
    /// let field = Field::try_with(11).unwrap();
    /// assert_eq!(field.neg(3), 8);
    /// assert_eq!(field.neg(0), 0);
    /// assert_eq!(field.add(3, field.neg(3)), 0);
    /// ```
    pub fn neg(&self, a: i64) -> i64 {
        self.sub(0, a)
    }

    /// Computes the multiplicative inverse `a^-1 mod q` with the extended
    /// Euclidean algorithm.
    ///
    /// # Errors
    ///
    /// Returns `IKKCryptoError::NoInverse` if `a` is 0 in the field.
    ///
    /// # Example
    ///
    /// ```
    /// # use ikk_crypto::field::Field;
    /// let field = Field::try_with(11).unwrap();
    /// assert_eq!(field.inv(3).unwrap(), 4); // 3 * 4 = 12 = 1 mod 11
    /// assert!(field.inv(0).is_err());
    /// assert!(field.inv(22).is_err());
    /// ```
    pub fn inv(&self, a: i64) -> Result<i64, IKKCryptoError> {
        let a_norm = self.normalize(a);
        if a_norm == 0 {
            return Err(IKKCryptoError::NoInverse(format!(
                "Cannot invert 0 in GF({})",
                self.modulus
            )));
        }

        let egcd = a_norm.extended_gcd(&(self.modulus as i64));
        if egcd.gcd != 1 {
            return Err(IKKCryptoError::NoInverse(format!(
                "Inverse does not exist for {} mod {} (gcd={})",
                a_norm, self.modulus, egcd.gcd
            )));
        }

        Ok(self.normalize(egcd.x))
    }

    /// Divides `a` by a nonzero `b`.
    pub fn div(&self, a: i64, b: i64) -> Result<i64, IKKCryptoError> {
        Ok(self.mul(a, self.inv(b)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        assert!(Field::try_with(2).is_ok());
        assert!(Field::try_with(11).is_ok());
        assert!(Field::try_with(1).is_err());
        assert!(Field::try_with(4).is_err());
        assert!(Field::try_with(25).is_err());
        assert!(Field::try_with(u64::MAX).is_err());
    }

    #[test]
    fn test_element_normalization() -> Result<(), IKKCryptoError> {
        let field = Field::try_with(11)?;
        assert_eq!(field.normalize(5), 5);
        assert_eq!(field.normalize(16), 5);
        assert_eq!(field.normalize(-6), 5);
        assert_eq!(field.normalize(i64::MIN), field.normalize(i64::MIN % 11));
        Ok(())
    }

    #[test]
    fn test_binary_field() -> Result<(), IKKCryptoError> {
        let field = Field::try_with(2)?;
        assert_eq!(field.add(1, 1), 0);
        assert_eq!(field.sub(0, 1), 1);
        assert_eq!(field.mul(1, 1), 1);
        assert_eq!(field.neg(1), 1);
        assert_eq!(field.inv(1)?, 1);
        Ok(())
    }

    #[test]
    fn test_addition_and_subtraction() -> Result<(), IKKCryptoError> {
        let field = Field::try_with(11)?;
        assert_eq!(field.add(5, 8), 2);
        assert_eq!(field.add(-3, 8), 5);
        assert_eq!(field.sub(5, 8), 8);
        assert_eq!(field.sub(8, 5), 3);
        Ok(())
    }

    #[test]
    fn test_multiplication_large_operands() -> Result<(), IKKCryptoError> {
        let field = Field::try_with(2_147_483_647)?;
        let a = 2_147_483_646;
        // (-1) * (-1) = 1
        assert_eq!(field.mul(a, a), 1);
        Ok(())
    }

    #[test]
    fn test_every_nonzero_element_has_inverse() -> Result<(), IKKCryptoError> {
        let field = Field::try_with(13)?;
        for a in 1..13 {
            let inv = field.inv(a)?;
            assert_eq!(field.mul(a, inv), 1);
        }
        assert_eq!(field.div(6, 3)?, 2);
        Ok(())
    }
}
