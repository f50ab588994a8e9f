//! Strongly typed identifiers for catalogue, profile, and ledger records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_identifier! {
    /// Identifier of a course record.
    CourseId
}

uuid_identifier! {
    /// Identifier of a student profile.
    StudentId
}

uuid_identifier! {
    /// Identifier of a ledger entry.
    EnrollmentId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_bare_uuid_string() {
        let uuid = Uuid::nil();
        let value = serde_json::to_value(CourseId::from_uuid(uuid)).expect("serialise");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn random_identifiers_differ() {
        assert_ne!(EnrollmentId::random(), EnrollmentId::random());
    }
}
