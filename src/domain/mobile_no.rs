use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

lazy_static! {
    static ref GEORGIAN_MOBILE_NO: Regex = Regex::new(r"^(?:\+?995)?(5\d{8})$").unwrap();
}

/// Georgian mobile number stored as its nine national digits.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[schema(value_type = String, example = "599123456")]
pub struct MobileNo(String);

impl MobileNo {
    pub fn parse(s: String) -> Result<MobileNo, String> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        match GEORGIAN_MOBILE_NO.captures(&compact) {
            Some(captures) => Ok(Self(captures[1].to_string())),
            None => Err(format!("{} is not a valid Georgian mobile number.", s)),
        }
    }

    pub fn get(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MobileNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub fn deserialize_mobile_no<'de, D>(deserializer: D) -> Result<MobileNo, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    MobileNo::parse(s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::MobileNo;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_mobile_no_formats() {
        for raw in ["599123456", "+995599123456", "995 599 12 34 56", "599-12-34-56"] {
            assert_eq!(MobileNo::parse(raw.to_string()).unwrap().get(), "599123456");
        }
    }

    #[test]
    fn test_invalid_mobile_no_is_rejected() {
        for raw in ["499123456", "59912345", "5991234567", "+1599123456", "abc"] {
            assert!(MobileNo::parse(raw.to_string()).is_err(), "{}", raw);
        }
    }

    #[quickcheck]
    fn eight_digit_suffix_after_five_is_valid(suffix: u32) -> bool {
        let number = format!("5{:08}", suffix % 100_000_000);
        MobileNo::parse(format!("+995{}", number))
            .map(|mobile_no| mobile_no.get() == number)
            .unwrap_or(false)
    }
}
