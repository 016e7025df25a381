//! Backing-relationship registry.
//!
//! Recovers the frame type a view class is backed by. Typed views declare it
//! statically through [`FrameBackedView::Frame`]; [`ViewClass::of`] captures
//! that declaration. Views registered explicitly describe it with a
//! [`Backing`] and may inherit it from a base class, mirroring a concrete
//! view that specializes a generic base view.
//!
//! Resolution walks the class and then its bases, nearest first:
//!
//! | nearest declaration | result |
//! |---------------------|--------|
//! | `Bound(t)` | `t` |
//! | `Unbound(param)` | [`ConfigError::UnboundFrameParameter`] |
//! | none at all | [`ConfigError::MissingFrameParameter`] |

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use horizon_pilot_core::{downcast_frame, Frame, FrameType};

use crate::error::{ConfigError, ConfigResult, PilotResult};
use crate::view::{CreateView, DisplayContext, FrameBackedView, View};

/// What a view class says about its backing frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// Nothing; defer to the base class.
    Undeclared,
    /// Generic over a frame parameter that this class does not fix.
    Unbound(&'static str),
    /// Backed by this concrete frame type.
    Bound(FrameType),
}

/// Builds a view, then binds it: create, `set_backing_frame`, `backing_frame_set`.
trait ViewFactory: Send + Sync {
    fn create_bound(
        &self,
        context: &DisplayContext,
        frame: &Arc<dyn Frame>,
    ) -> PilotResult<Arc<dyn View>>;
}

struct TypedFactory<V>(PhantomData<fn() -> V>);

impl<V> ViewFactory for TypedFactory<V>
where
    V: FrameBackedView + CreateView,
{
    fn create_bound(
        &self,
        context: &DisplayContext,
        frame: &Arc<dyn Frame>,
    ) -> PilotResult<Arc<dyn View>> {
        let view_name = std::any::type_name::<V>();
        let typed = downcast_frame::<V::Frame>(frame.clone()).map_err(|source| {
            ConfigError::FrameTypeMismatch {
                view: view_name,
                source,
            }
        })?;

        let view = V::create(context).map_err(|source| ConfigError::construction(view_name, source))?;
        let view = Arc::new(view);
        view.set_backing_frame(typed.clone())?.backing_frame_set(&typed);
        Ok(view)
    }
}

/// Runtime descriptor of a view type.
#[derive(Clone)]
pub struct ViewClass {
    name: &'static str,
    view_type: TypeId,
    backing: Backing,
    base: Option<Arc<ViewClass>>,
    factory: Option<Arc<dyn ViewFactory>>,
}

impl ViewClass {
    /// Descriptor of a typed frame-backed view.
    pub fn of<V>() -> Self
    where
        V: FrameBackedView + CreateView,
    {
        Self {
            name: std::any::type_name::<V>(),
            view_type: TypeId::of::<V>(),
            backing: Backing::Bound(FrameType::of::<V::Frame>()),
            base: None,
            factory: Some(Arc::new(TypedFactory::<V>(PhantomData))),
        }
    }

    /// Descriptor of a view registered by explicit declaration.
    ///
    /// Declared classes carry no constructor and cannot be top-level views of
    /// a type handler; they serve as bases and as the descriptors of views
    /// built by other means.
    pub fn declared<V: View>(backing: Backing) -> Self {
        Self {
            name: std::any::type_name::<V>(),
            view_type: TypeId::of::<V>(),
            backing,
            base: None,
            factory: None,
        }
    }

    /// Set the base class this class inherits its backing from.
    pub fn extending(mut self, base: ViewClass) -> Self {
        self.base = Some(Arc::new(base));
        self
    }

    /// Full type name of the view.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The view's `TypeId`.
    pub fn view_type(&self) -> TypeId {
        self.view_type
    }

    /// This class's own declaration, ignoring bases.
    pub fn backing(&self) -> Backing {
        self.backing
    }

    /// The base class, if any.
    pub fn base(&self) -> Option<&ViewClass> {
        self.base.as_deref()
    }

    /// Whether the handler can construct and bind this class.
    pub fn is_frame_backed(&self) -> bool {
        self.factory.is_some()
    }

    /// This class followed by its bases, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &ViewClass> {
        std::iter::successors(Some(self), |class| class.base())
    }

    pub(crate) fn create_bound(
        &self,
        context: &DisplayContext,
        frame: &Arc<dyn Frame>,
    ) -> PilotResult<Arc<dyn View>> {
        let factory = self
            .factory
            .as_ref()
            .ok_or(ConfigError::NotFrameBacked { view: self.name })?;
        factory.create_bound(context, frame)
    }
}

impl fmt::Debug for ViewClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewClass")
            .field("name", &self.name)
            .field("backing", &self.backing)
            .field("base", &self.base.as_ref().map(|b| b.name))
            .field("frame_backed", &self.is_frame_backed())
            .finish()
    }
}

/// Resolve the concrete frame type a view class is backed by.
pub fn resolve_frame_type(class: &ViewClass) -> ConfigResult<FrameType> {
    for ancestor in class.lineage() {
        match ancestor.backing() {
            Backing::Bound(frame_type) => return Ok(frame_type),
            Backing::Unbound(param) => {
                return Err(ConfigError::UnboundFrameParameter {
                    view: class.name(),
                    declared_by: ancestor.name(),
                    param,
                });
            }
            Backing::Undeclared => {}
        }
    }
    Err(ConfigError::MissingFrameParameter { view: class.name() })
}

/// The frame type a live view is backed by.
pub fn resolve_view_frame_type(view: &dyn View) -> Option<FrameType> {
    view.backing_frame_type()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, PilotError};
    use crate::layout::{FrameContent, FrameLayout};
    use horizon_pilot_core::FrameObservers;

    struct ReportFrame {
        observers: FrameObservers,
    }

    impl Frame for ReportFrame {
        fn observers(&self) -> &FrameObservers {
            &self.observers
        }
    }

    struct ChartFrame {
        observers: FrameObservers,
    }

    impl Frame for ChartFrame {
        fn observers(&self) -> &FrameObservers {
            &self.observers
        }
    }

    struct ReportContent;

    impl FrameContent for ReportContent {
        type Frame = ReportFrame;

        fn create(_context: &DisplayContext) -> Result<Self, BoxError> {
            Ok(ReportContent)
        }
    }

    struct BrokenContent;

    impl FrameContent for BrokenContent {
        type Frame = ReportFrame;

        fn create(_context: &DisplayContext) -> Result<Self, BoxError> {
            Err("font cache unavailable".into())
        }
    }

    struct PlainView;
    impl View for PlainView {}

    struct GenericBase;
    impl View for GenericBase {}

    type ReportView = FrameLayout<ReportContent>;

    #[test]
    fn test_typed_class_resolves() {
        let class = ViewClass::of::<ReportView>();
        assert!(class.is_frame_backed());
        assert_eq!(resolve_frame_type(&class).unwrap(), FrameType::of::<ReportFrame>());
    }

    #[test]
    fn test_missing_frame_parameter() {
        let class = ViewClass::declared::<PlainView>(Backing::Undeclared);
        let err = resolve_frame_type(&class).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFrameParameter { .. }));
    }

    #[test]
    fn test_inherited_through_base_chain() {
        let base = ViewClass::declared::<GenericBase>(Backing::Unbound("P"));
        let middle = ViewClass::declared::<PlainView>(Backing::Bound(FrameType::of::<ChartFrame>()))
            .extending(base);
        let leaf = ViewClass::declared::<PlainView>(Backing::Undeclared).extending(middle);

        assert_eq!(leaf.lineage().count(), 3);
        assert_eq!(resolve_frame_type(&leaf).unwrap(), FrameType::of::<ChartFrame>());
    }

    #[test]
    fn test_unbound_parameter() {
        let base = ViewClass::declared::<GenericBase>(Backing::Unbound("P"));
        let still_generic = ViewClass::declared::<PlainView>(Backing::Undeclared).extending(base);

        match resolve_frame_type(&still_generic).unwrap_err() {
            ConfigError::UnboundFrameParameter { param, declared_by, .. } => {
                assert_eq!(param, "P");
                assert!(declared_by.ends_with("GenericBase"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let class = ViewClass::of::<ReportView>();
        assert_eq!(resolve_frame_type(&class).unwrap(), resolve_frame_type(&class.clone()).unwrap());
    }

    #[test]
    fn test_create_bound_binds_frame() {
        let class = ViewClass::of::<ReportView>();
        let frame: Arc<dyn Frame> = Arc::new(ReportFrame {
            observers: FrameObservers::new(),
        });

        let view = class.create_bound(&DisplayContext::new("test"), &frame).unwrap();
        let report = view.downcast_ref::<ReportView>().unwrap();
        let bound: Arc<dyn Frame> = report.backing_frame().unwrap();
        assert!(Arc::ptr_eq(&bound, &frame));
        assert_eq!(resolve_view_frame_type(view.as_ref()), Some(FrameType::of::<ReportFrame>()));
    }

    #[test]
    fn test_create_bound_rejects_wrong_frame() {
        let class = ViewClass::of::<ReportView>();
        let frame: Arc<dyn Frame> = Arc::new(ChartFrame {
            observers: FrameObservers::new(),
        });

        let err = class.create_bound(&DisplayContext::new("test"), &frame).unwrap_err();
        assert!(matches!(
            err,
            PilotError::Config(ConfigError::FrameTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_construction_failure_is_configuration_error() {
        let class = ViewClass::of::<FrameLayout<BrokenContent>>();
        let frame: Arc<dyn Frame> = Arc::new(ReportFrame {
            observers: FrameObservers::new(),
        });

        let err = class.create_bound(&DisplayContext::new("test"), &frame).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("font cache unavailable"));
    }

    #[test]
    fn test_declared_class_cannot_be_built() {
        let class = ViewClass::declared::<PlainView>(Backing::Bound(FrameType::of::<ReportFrame>()));
        let frame: Arc<dyn Frame> = Arc::new(ReportFrame {
            observers: FrameObservers::new(),
        });

        let err = class.create_bound(&DisplayContext::new("test"), &frame).unwrap_err();
        assert!(matches!(err, PilotError::Config(ConfigError::NotFrameBacked { .. })));
    }
}
