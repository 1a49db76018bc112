//! Closed sets of labels carried by school records.
//!
//! Every label round-trips through its display string, which is also the
//! value written to the store and to exported sheets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

macro_rules! labelled {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn parse(value: &str) -> Result<Self> {
                match value {
                    $($label => Ok($name::$variant),)+
                    _ => Err(Error::UnknownCategory {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled! {
    /// Home language of a student or family.
    Language, "language" {
        English => "English",
        Spanish => "Spanish",
        Arabic => "Arabic",
        Russian => "Russian",
    }
}

impl Language {
    /// English-language learners are students whose home language is not English.
    pub fn is_ell(self) -> bool {
        self != Language::English
    }
}

labelled! {
    /// Reported ethnicity category.
    Ethnicity, "ethnicity" {
        HispanicOrLatino => "Hispanic or Latino",
        BlackOrAfricanAmerican => "Black or African American",
        White => "White",
        AsianOrPacificIslander => "Asian or Native Hawaiian/Other Pacific Islander",
        Multiracial => "Multiracial",
    }
}

labelled! {
    Gender, "gender" {
        Male => "Male",
        Female => "Female",
    }
}

labelled! {
    /// Relationship of a guardian or emergency contact to the student.
    Relationship, "relationship" {
        Mother => "Mother",
        Father => "Father",
        Guardian => "Guardian",
    }
}

labelled! {
    DismissalMethod, "dismissal method" {
        ParentPickUp => "Parent Pick Up",
        Bus => "Bus",
    }
}

labelled! {
    /// Channel used for a family contact log entry.
    ContactMethod, "contact method" {
        Phone => "Phone",
        Email => "Email",
        InPerson => "In-Person",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for ethnicity in Ethnicity::ALL {
            assert_eq!(Ethnicity::parse(ethnicity.as_str()).ok(), Some(*ethnicity));
        }
        assert_eq!(ContactMethod::parse("In-Person").ok(), Some(ContactMethod::InPerson));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = Language::parse("Klingon").expect_err("unknown language");
        assert_eq!(err.to_string(), "unknown language 'Klingon'");
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&DismissalMethod::ParentPickUp).expect("serialize");
        assert_eq!(json, "\"Parent Pick Up\"");
        assert!(!Language::English.is_ell());
        assert!(Language::Arabic.is_ell());
    }
}
