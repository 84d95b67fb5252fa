pub mod card;
pub mod field_engine;
pub mod payload;
pub mod rules;

pub use card::CardBrand;
pub use field_engine::{validate_field, FieldValidationEngine, NamedValidator};
pub use payload::{validate, validate_order_data, validate_payment_data, ValidationOutcome, ValidationReport};
pub use rules::{Validation, ALLOWED_PAYMENT_METHODS};

#[cfg(test)]
mod property_tests {
    //! Randomized check over the Luhn implementation: generated checksum
    //! valid numbers always validate, and flipping any one digit breaks
    //! them. Seeded LCG keeps the run deterministic.

    use crate::card::luhn_valid;
    use crate::rules::validate_card_number;

    struct Lcg(u64);

    impl Lcg {
        fn next_digit(&mut self) -> u32 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((self.0 >> 33) % 10) as u32
        }
    }

    /// Build a 16-digit number whose last digit is the Luhn check digit.
    fn random_card(rng: &mut Lcg) -> String {
        let mut digits: Vec<u32> = (0..15).map(|_| rng.next_digit()).collect();
        let sum: u32 = digits
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &d)| {
                // Positions are counted from the right of the full number,
                // so the body digits alternate starting with a doubled one.
                if i % 2 == 0 {
                    let doubled = d * 2;
                    if doubled > 9 {
                        doubled - 9
                    } else {
                        doubled
                    }
                } else {
                    d
                }
            })
            .sum();
        digits.push((10 - sum % 10) % 10);
        digits.into_iter().map(|d| char::from_digit(d, 10).unwrap()).collect()
    }

    #[test]
    fn generated_numbers_pass_and_flips_fail() {
        let mut rng = Lcg(0x5eed);
        for _ in 0..200 {
            let number = random_card(&mut rng);
            assert!(luhn_valid(&number), "{number} should pass Luhn");
            assert!(
                validate_card_number(&number).is_valid,
                "{number} should validate"
            );

            for pos in 0..number.len() {
                let mut flipped: Vec<char> = number.chars().collect();
                let original = flipped[pos].to_digit(10).unwrap();
                flipped[pos] = char::from_digit((original + 1) % 10, 10).unwrap();
                let flipped: String = flipped.into_iter().collect();
                assert!(
                    !validate_card_number(&flipped).is_valid,
                    "{flipped} (flip at {pos}) should fail"
                );
            }
        }
    }
}
