//! Decoding of encoded size/material codes such as `8PVC`.

use pest::Parser;

use crate::log::debug;
use crate::{LineTypeParser, Rule};

/// Units per nominal inch in an encoded size
pub const SIZE_UNITS_PER_INCH: f64 = 12.0;

/// Decoded size code. A zero `nominal_size` means unsized: no marker.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSize {
    pub nominal_size: f64,
    pub label: String,
}

impl DecodedSize {
    pub fn none() -> Self {
        Self {
            nominal_size: 0.0,
            label: String::new(),
        }
    }

    pub fn is_sized(&self) -> bool {
        self.nominal_size > 0.0
    }
}

/// Decode an encoded size string.
///
/// The first digit run is the size in twelfths; every letter run is appended
/// to the material. The label shows the raw digit value, not the divided one.
pub fn decode(encoded: &str) -> DecodedSize {
    let pairs = match LineTypeParser::parse(Rule::size_code, encoded) {
        Ok(pairs) => pairs,
        Err(e) => {
            debug!(encoded, error = %e, "size code did not parse");
            return DecodedSize::none();
        }
    };

    let mut digits: Option<&str> = None;
    let mut material = String::new();
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::digits if digits.is_none() => digits = Some(pair.as_str()),
            Rule::letters => material.push_str(pair.as_str()),
            _ => {}
        }
    }

    let Some(raw) = digits
        .and_then(|d| d.parse::<u32>().ok())
        .filter(|&raw| raw > 0)
    else {
        return DecodedSize::none();
    };
    DecodedSize {
        nominal_size: f64::from(raw) / SIZE_UNITS_PER_INCH,
        label: format!("{raw}\"{material}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pvc_eight() {
        let size = decode("8PVC");
        assert_eq!(size.nominal_size, 8.0 / 12.0);
        insta::assert_snapshot!(size.label, @r#"8"PVC"#);
    }

    #[test]
    fn label_uses_raw_digits() {
        let size = decode("12DIP");
        assert_eq!(size.nominal_size, 1.0);
        assert_eq!(size.label, "12\"DIP");
        assert_eq!(decode("08PVC").label, "8\"PVC");
    }

    #[test]
    fn material_first_and_separators() {
        assert_eq!(decode("PVC-8").label, "8\"PVC");
        assert_eq!(decode("4 HDPE").label, "4\"HDPE");
    }

    #[test]
    fn only_first_digit_run_counts() {
        let size = decode("6C900PVC");
        assert_eq!(size.nominal_size, 0.5);
        assert_eq!(size.label, "6\"CPVC");
    }

    #[test]
    fn digits_without_material() {
        assert_eq!(decode("24").label, "24\"");
    }

    #[test]
    fn no_digits_is_unsized() {
        for code in ["PVC", "", "---", "Continuous"] {
            let size = decode(code);
            assert!(!size.is_sized(), "{code:?}");
            assert_eq!(size, DecodedSize::none());
        }
    }

    #[test]
    fn zero_size_is_unsized() {
        assert_eq!(decode("0PVC"), DecodedSize::none());
        assert_eq!(decode("00"), DecodedSize::none());
    }

    #[test]
    fn overflowing_digits_are_unsized() {
        assert!(!decode("99999999999999999999PVC").is_sized());
    }

    #[test]
    fn non_ascii_is_skipped() {
        assert_eq!(decode("8ØPVC").label, "8\"PVC");
    }
}
