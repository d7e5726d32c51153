use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                let id = s.into();
                assert!(!id.is_empty(), "{} cannot be empty", stringify!($name));
                Self(id)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

id_newtype!(TicketId);
id_newtype!(AdminId);
id_newtype!(UserId);

impl TicketId {
    /// Fresh random identifier for a newly created ticket.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "TicketId cannot be empty")]
    fn ticket_id_empty_string_panics() {
        TicketId::new("");
    }

    #[test]
    #[should_panic(expected = "AdminId cannot be empty")]
    fn admin_id_empty_string_panics() {
        AdminId::new("");
    }

    #[test]
    fn ticket_id_from_str() {
        let id: TicketId = "T1".into();
        assert_eq!(id.as_str(), "T1");
    }

    #[test]
    fn user_id_from_string() {
        let id: UserId = String::from("u-42").into();
        assert_eq!(id.to_string(), "u-42");
    }

    #[test]
    fn generated_ticket_ids_are_distinct() {
        let a = TicketId::generate();
        let b = TicketId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&AdminId::new("A1")).unwrap();
        assert_eq!(json, "\"A1\"");
    }
}
