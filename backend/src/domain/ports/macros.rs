//! Generates port error enums with snake_case constructors.
//!
//! Each variant `Foo { a: A, b: B } => "message"` expands to a `thiserror`
//! variant plus `fn foo(a: impl Into<A>, b: impl Into<B>) -> Self`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::CourseId;

    define_port_error! {
        pub enum SeatPortError {
            Unreachable => "seat store unreachable",
            Rejected { message: String } => "seat store rejected: {message}",
            Full { course_id: CourseId, capacity: u32 } => "course {course_id} full at {capacity}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SeatPortError::unreachable(), SeatPortError::Unreachable);
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        assert_eq!(
            SeatPortError::rejected("duplicate").to_string(),
            "seat store rejected: duplicate"
        );
    }

    #[test]
    fn typed_fields_keep_their_types() {
        let course_id = CourseId::random();
        let error = SeatPortError::full(course_id, 30_u32);
        assert_eq!(error.to_string(), format!("course {course_id} full at 30"));
    }
}
