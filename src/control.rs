//! Live objects
//!
//! Traits implemented by the controls whose nested option groups receive
//! synchronized values. Dispatch from a node identifier to a live property goes
//! through accessor function pointers collected once per control type.

use crate::descriptor::Describe;
use crate::error::SyncResult;
use crate::value::Value;

/// A nested composite of a control, e.g. a view-options object
pub trait OptionGroup {
    /// Write one settable field. Returns `Ok(false)` when the group has no
    /// settable field of that name.
    fn set_field(&mut self, name: &str, value: &Value) -> SyncResult<bool>;
}

/// Borrow the nested option group held by one property of a control, if any
pub type Accessor<C> = fn(&mut C) -> Option<&mut dyn OptionGroup>;

/// A control taking part in option synchronization
pub trait Control: Describe {
    /// Name of the option group this control type is configured under
    fn option_group() -> &'static str;

    /// Property name -> accessor for every composite property that can be synchronized
    fn accessors() -> Vec<(&'static str, Accessor<Self>)>
    where
        Self: Sized;
}

/// Implement [`Describe`] and [`OptionGroup`] for a struct of scalar fields.
///
/// ```ignore
/// option_group! {
///     GridOptionsView {
///         "ShowHeader" => show_header: bool,
///         "RowHeight" => row_height: i32,
///     }
///     read_only {
///         "IsLoading": bool,
///     }
/// }
/// ```
#[macro_export]
macro_rules! option_group {
    (
        $ty:ident {
            $( $name:literal => $field:ident : $fty:ty ),* $(,)?
        }
        $( read_only { $( $ro_name:literal : $ro_fty:ty ),* $(,)? } )?
    ) => {
        impl $crate::descriptor::Describe for $ty {
            fn type_name() -> &'static str {
                stringify!($ty)
            }

            fn describe() -> $crate::descriptor::TypeDescriptor {
                $crate::descriptor::TypeDescriptor::new(stringify!($ty))
                    $(
                        .with_property($crate::descriptor::PropertyDescriptor::settable(
                            $name,
                            <$fty as $crate::value::Scalar>::value_type(),
                        ))
                    )*
                    $($(
                        .with_property($crate::descriptor::PropertyDescriptor::read_only(
                            $ro_name,
                            <$ro_fty as $crate::value::Scalar>::value_type(),
                        ))
                    )*)?
            }
        }

        impl $crate::control::OptionGroup for $ty {
            fn set_field(
                &mut self,
                name: &str,
                value: &$crate::value::Value,
            ) -> $crate::error::SyncResult<bool> {
                match name {
                    $(
                        $name => {
                            self.$field = <$fty as $crate::value::Scalar>::from_value(name, value)?;
                            Ok(true)
                        }
                    )*
                    _ => Ok(false),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyDescriptor;
    use crate::value::ValueType;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct PrintOptions {
        landscape: bool,
        margin: f64,
        title: String,
    }

    option_group! {
        PrintOptions {
            "Landscape" => landscape: bool,
            "Margin" => margin: f64,
            "Title" => title: String,
        }
        read_only {
            "PageCount": i64,
        }
    }

    #[test]
    fn test_generated_descriptor() {
        let descriptor = PrintOptions::describe();

        assert_eq!(PrintOptions::type_name(), "PrintOptions");
        assert_eq!(
            descriptor.properties,
            vec![
                PropertyDescriptor::settable("Landscape", ValueType::Bool),
                PropertyDescriptor::settable("Margin", ValueType::Float),
                PropertyDescriptor::settable("Title", ValueType::Text),
                PropertyDescriptor::read_only("PageCount", ValueType::Int),
            ]
        );
    }

    #[test]
    fn test_generated_setters() {
        let mut options = PrintOptions::default();

        assert!(options.set_field("Landscape", &Value::Bool(true)).unwrap());
        assert!(options.set_field("Margin", &Value::Int(2)).unwrap());
        assert!(options.set_field("Title", &Value::from("Orders")).unwrap());
        assert!(!options.set_field("PageCount", &Value::Int(3)).unwrap());
        assert!(options.set_field("Landscape", &Value::Int(1)).is_err());

        assert!(options.landscape);
        assert_eq!(options.margin, 2.0);
        assert_eq!(options.title, "Orders");
    }
}
