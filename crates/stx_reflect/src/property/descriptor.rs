use alloc::boxed::Box;
use core::fmt;

use crate::error::PropertyError;
use crate::property::Accessor;
use crate::ty::{Type, TypeShape};
use crate::value::{AnyValue, ErasedMut, ErasedRef};

type Reader = Box<dyn Fn(ErasedRef<'_>) -> Option<AnyValue> + Send + Sync>;
type Writer = Box<dyn Fn(ErasedMut<'_>, AnyValue) -> Result<(), WriteFailure> + Send + Sync>;

enum WriteFailure {
    Instance,
    Value(&'static Type),
}

/// A named attribute of a [`Class`](crate::Class).
///
/// Created by [`ClassBuilder::add_property`](crate::ClassBuilder::add_property).
pub struct Property {
    class: &'static str,
    name: &'static str,
    ty: fn() -> &'static Type,
    reader: Reader,
    writer: Option<Writer>,
}

impl Property {
    pub(crate) fn new<T, F>(class: &'static str, name: &'static str, accessor: Accessor<T, F>) -> Self
    where
        T: TypeShape + 'static,
        F: Clone + TypeShape + 'static,
    {
        let Accessor { get, set } = accessor;

        let reader: Reader = Box::new(move |instance: ErasedRef<'_>| {
            instance
                .downcast_ref::<T>()
                .map(|this| AnyValue::new(get(this)))
        });

        let writer = set.map(|set| -> Writer {
            Box::new(move |instance: ErasedMut<'_>, value: AnyValue| {
                let this = instance.downcast_mut::<T>().ok_or(WriteFailure::Instance)?;
                let value = value
                    .take::<F>()
                    .map_err(|value| WriteFailure::Value(value.ty()))?;
                set(this, value);
                Ok(())
            })
        });

        Self {
            class,
            name,
            ty: Type::of::<F>,
            reader,
            writer,
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The default name of the declaring class.
    #[inline(always)]
    pub const fn class_name(&self) -> &'static str {
        self.class
    }

    /// The declared value type.
    #[inline]
    pub fn ty(&self) -> &'static Type {
        (self.ty)()
    }

    /// Returns `true` if the property has a write accessor.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Reads the property of `instance`.
    pub fn read(&self, instance: ErasedRef<'_>) -> Result<AnyValue, PropertyError> {
        (self.reader)(instance).ok_or(PropertyError::InstanceMismatch {
            class: self.class,
            property: self.name,
            found: instance.ty(),
        })
    }

    /// Writes `value` to the property of `instance`.
    ///
    /// `value` must be convertible to [`Property::ty`].
    pub fn write(&self, instance: ErasedMut<'_>, value: AnyValue) -> Result<(), PropertyError> {
        let Some(writer) = &self.writer else {
            return Err(PropertyError::ReadOnly {
                class: self.class,
                property: self.name,
            });
        };
        let found = instance.ty();
        writer(instance, value).map_err(|failure| match failure {
            WriteFailure::Instance => PropertyError::InstanceMismatch {
                class: self.class,
                property: self.name,
                found,
            },
            WriteFailure::Value(found) => PropertyError::ValueMismatch {
                class: self.class,
                property: self.name,
                expected: self.ty(),
                found,
            },
        })
    }

    /// [`Property::read`] on a typed instance.
    #[inline]
    pub fn read_from<T: TypeShape + 'static>(&self, instance: &T) -> Result<AnyValue, PropertyError> {
        self.read(ErasedRef::new(instance))
    }

    /// [`Property::write`] on a typed instance.
    #[inline]
    pub fn write_to<T: TypeShape + 'static>(
        &self,
        instance: &mut T,
        value: AnyValue,
    ) -> Result<(), PropertyError> {
        self.write(ErasedMut::new(instance), value)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("class", &self.class)
            .field("name", &self.name)
            .field("ty", self.ty())
            .field("writable", &self.is_writable())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::error::PropertyError;
    use crate::property::Accessor;
    use crate::ty::{Shape, TypeShape};
    use crate::value::{ErasedMut, ErasedRef};
    use crate::{AnyValue, Class, ClassBuilder, ClassDeclaration, Type, impl_type_shape, impl_upcast};

    #[derive(Clone, Debug, PartialEq, Default)]
    struct Widget {
        id: u32,
        label: String,
        width: f32,
    }

    impl Widget {
        fn area_hint(&self) -> f32 {
            self.width * 2.0
        }

        fn set_area_hint(&mut self, hint: f32) {
            self.width = hint / 2.0;
        }
    }

    #[derive(Clone, Debug, PartialEq, Default)]
    struct Button {
        widget: Widget,
        pressed: bool,
    }

    impl ClassDeclaration for Widget {
        const NAME: &'static str = "property::Widget";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class
                .add_property("id", Accessor::field_ref(|w: &Widget| &w.id))
                .add_property("label", Accessor::field(|w: &Widget| &w.label, |w| &mut w.label))
                .add_property(
                    "area_hint",
                    Accessor::getter(Widget::area_hint).with_setter(Widget::set_area_hint),
                )
                .add_property("double_id", Accessor::getter(|w: &Widget| w.id * 2));
        }
    }

    impl ClassDeclaration for Button {
        const NAME: &'static str = "property::Button";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class
                .add_base_class::<Widget>()
                .add_property("pressed", Accessor::field(|b: &Button| &b.pressed, |b| &mut b.pressed));
        }
    }

    impl_type_shape!(Widget);
    impl_type_shape!(Button);
    impl_upcast!(Button => Widget: widget);

    fn widget() -> Widget {
        Widget {
            id: 7,
            label: String::from("ok"),
            width: 3.0,
        }
    }

    #[test]
    fn metadata() {
        let class = Class::of::<Widget>();
        let label = class.get_property("label").unwrap();
        assert_eq!(label.name(), "label");
        assert_eq!(label.class_name(), "property::Widget");
        assert_eq!(label.ty(), Type::of::<String>());
        assert!(label.is_writable());

        let id = class.get_property("id").unwrap();
        assert_eq!(id.ty(), Type::of::<u32>());
        assert!(!id.is_writable());
        assert!(!class.get_property("double_id").unwrap().is_writable());
        assert!(class.get_property("area_hint").unwrap().is_writable());
    }

    #[test]
    fn read_and_write_fields() {
        let class = Class::of::<Widget>();
        let mut widget = widget();

        let label = class.get_property("label").unwrap();
        assert_eq!(label.read_from(&widget).unwrap().get::<String>(), "ok");

        label
            .write_to(&mut widget, AnyValue::new(String::from("cancel")))
            .unwrap();
        assert_eq!(widget.label, "cancel");
    }

    #[test]
    fn getter_and_setter() {
        let class = Class::of::<Widget>();
        let mut widget = widget();

        let hint = class.get_property("area_hint").unwrap();
        assert_eq!(*hint.read_from(&widget).unwrap().get::<f32>(), 6.0);
        hint.write_to(&mut widget, AnyValue::new(10.0f32)).unwrap();
        assert_eq!(widget.width, 5.0);

        let double = class.get_property("double_id").unwrap();
        assert_eq!(*double.read_from(&widget).unwrap().get::<u32>(), 14);
    }

    #[test]
    fn read_only_rejects_writes() {
        let class = Class::of::<Widget>();
        let mut widget = widget();
        let err = class
            .get_property("id")
            .unwrap()
            .write_to(&mut widget, AnyValue::new(1u32))
            .unwrap_err();
        assert_eq!(
            err,
            PropertyError::ReadOnly {
                class: "property::Widget",
                property: "id"
            }
        );
        assert_eq!(widget.id, 7);
    }

    #[test]
    fn mismatches() {
        let class = Class::of::<Widget>();
        let label = class.get_property("label").unwrap();

        let mut other = 5u8;
        assert!(matches!(
            label.read(ErasedRef::new(&other)),
            Err(PropertyError::InstanceMismatch { .. })
        ));
        assert!(matches!(
            label.write(ErasedMut::new(&mut other), AnyValue::new(String::new())),
            Err(PropertyError::InstanceMismatch { .. })
        ));

        let mut widget = widget();
        let err = label.write_to(&mut widget, AnyValue::new(3i64)).unwrap_err();
        assert_eq!(
            err,
            PropertyError::ValueMismatch {
                class: "property::Widget",
                property: "label",
                expected: Type::of::<String>(),
                found: Type::of::<i64>(),
            }
        );
        assert_eq!(widget.label, "ok");
    }

    #[test]
    fn derived_instances() {
        let button = Class::of::<Button>();
        assert!(button.get_property("label").is_none());

        let label = button.find_property("label").unwrap();
        let mut value = AnyValue::new(Button {
            widget: widget(),
            pressed: false,
        });

        label
            .write(value.as_erased_mut().unwrap(), AnyValue::new(String::from("go")))
            .unwrap();
        assert_eq!(value.get::<Button>().widget.label, "go");
        assert_eq!(
            label.read(value.as_erased().unwrap()).unwrap().get::<String>(),
            "go"
        );

        let names: alloc::vec::Vec<_> = button.all_properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["pressed", "id", "label", "area_hint", "double_id"]);
    }

    #[derive(Clone)]
    struct Twice;

    impl ClassDeclaration for Twice {
        const NAME: &'static str = "property::Twice";

        fn declare(class: &mut ClassBuilder<'_, Self>) {
            class
                .add_property("x", Accessor::getter(|_: &Twice| 1u8))
                .add_property("x", Accessor::getter(|_: &Twice| 2u8));
        }
    }

    // Implemented by hand so `auto_register` never seals it.
    impl TypeShape for Twice {
        type Plain = Self;

        fn shape() -> Shape {
            Shape::new::<Self>()
        }
    }

    #[test]
    #[should_panic(expected = "declares property `x` more than once")]
    fn duplicate_property_is_fatal() {
        let _ = Class::of::<Twice>();
    }
}
