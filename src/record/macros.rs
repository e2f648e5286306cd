//! Declarative record definitions
//!
//! `record!` declares a struct and its `Record` implementation from one
//! field list. Field metadata, bind values and scan slots are all generated
//! from that list, so their order cannot disagree.
//!
//! ```ignore
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Tag in "tags" {
//!         pub id: i64 => "id" as "id" [identifier],
//!         pub label: String => "label" as "label",
//!         pub created_at: DateTime<Utc> => "createdAt" as "created_at" [read_only],
//!     }
//! }
//! ```
//!
//! Each field is `name: Type => "externalName" as "column_name"` followed by
//! optional flags in brackets: `identifier` (implies read-only) and
//! `read_only`. Field types must implement `ColumnType`.

#[macro_export]
macro_rules! record {
    (@identifier $out:ident, $value:expr, identifier $(, $rest:ident)*) => {
        $out = $value
    };
    (@identifier $out:ident, $value:expr, $other:ident $(, $rest:ident)*) => {
        $crate::record!(@identifier $out, $value $(, $rest)*)
    };
    (@identifier $out:ident, $value:expr) => {};

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident in $table:literal {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $external:literal as $column:literal
                $([ $($flag:ident),+ ])?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )+
        }

        impl $crate::record::Record for $name {
            fn table_name() -> &'static str {
                $table
            }

            fn fields() -> &'static [$crate::record::Field] {
                const FIELDS: &[$crate::record::Field] = &[
                    $(
                        $crate::record::Field::new($external, $column)
                            $($( .$flag() )+)?
                    ),+
                ];
                FIELDS
            }

            fn id(&self) -> i64 {
                #[allow(unused_mut)]
                let mut id: i64 = 0;
                $(
                    $crate::record!(@identifier id, self.$field $($(, $flag)+)?);
                )+
                id
            }

            fn values(&self) -> ::std::vec::Vec<$crate::record::SqlValue> {
                ::std::vec![
                    $( $crate::record::ColumnType::to_sql(&self.$field) ),+
                ]
            }

            fn slots(&mut self) -> ::std::vec::Vec<$crate::record::Slot<'_>> {
                ::std::vec![
                    $( $crate::record::ColumnType::slot(&mut self.$field) ),+
                ]
            }
        }
    };
}
