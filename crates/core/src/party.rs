//! The two sides of every agreement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which side of an agreement an actor speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Company,
    Student,
}

impl Party {
    pub fn as_str(self) -> &'static str {
        match self {
            Party::Company => "company",
            Party::Student => "student",
        }
    }

    /// The other side of the agreement.
    pub fn counterpart(self) -> Party {
        match self {
            Party::Company => Party::Student,
            Party::Student => Party::Company,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Party {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(Party::Company),
            "student" => Ok(Party::Student),
            other => Err(CoreError::Validation(format!(
                "Invalid party '{other}'. Must be one of: company, student"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_is_an_involution() {
        assert_eq!(Party::Company.counterpart(), Party::Student);
        assert_eq!(Party::Student.counterpart(), Party::Company);
        assert_eq!(Party::Company.counterpart().counterpart(), Party::Company);
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("company".parse::<Party>().unwrap(), Party::Company);
        assert_eq!("student".parse::<Party>().unwrap(), Party::Student);
        assert!("Company".parse::<Party>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Party::Student).unwrap();
        assert_eq!(json, "\"student\"");
    }
}
