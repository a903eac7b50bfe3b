//! Status and role enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding database lookup table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID back to the enum, if known.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Course lifecycle status. Only `Active` courses accept enrollment.
    CourseStatus {
        Draft = 1,
        Active = 2,
        Closed = 3,
    }
}

define_status_enum! {
    /// Enrollment row status. Rows move `Enrolled -> Cancelled` and never
    /// back; a re-admission creates a fresh row.
    EnrollmentStatus {
        Enrolled = 1,
        Cancelled = 2,
    }
}

define_status_enum! {
    /// Participant role. Immutable after user creation as far as the
    /// admission core is concerned.
    UserRole {
        Student = 1,
        Instructor = 2,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
