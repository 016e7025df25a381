//! Integration tests for presenting frames through a type handler.

use std::cell::{Cell, RefCell};
use std::sync::{Arc, OnceLock, Weak};

use horizon_pilot::prelude::*;
use horizon_pilot::{ConfigError, ConfigResult};
use parking_lot::Mutex;

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(event: impl Into<String>) {
    EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

fn take_events() -> Vec<String> {
    EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
}

/// Route `tracing` output through the test harness; `RUST_LOG` selects targets.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Frames
// ============================================================================

struct DocumentFrame {
    id: u32,
    observers: FrameObservers,
}

impl DocumentFrame {
    fn new(id: u32) -> Arc<Self> {
        Arc::new(Self {
            id,
            observers: FrameObservers::new(),
        })
    }
}

impl Frame for DocumentFrame {
    fn observers(&self) -> &FrameObservers {
        &self.observers
    }
}

struct OutlineFrame {
    observers: FrameObservers,
}

impl OutlineFrame {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            observers: FrameObservers::new(),
        })
    }
}

impl Frame for OutlineFrame {
    fn observers(&self) -> &FrameObservers {
        &self.observers
    }
}

// ============================================================================
// Views
// ============================================================================

struct DocumentContent;

impl FrameContent for DocumentContent {
    type Frame = DocumentFrame;

    fn create(context: &DisplayContext) -> Result<Self, BoxError> {
        record(format!("create document in {}", context.container_name()));
        Ok(DocumentContent)
    }

    fn backing_frame_set(&self, frame: &Arc<DocumentFrame>) {
        record(format!("bound document {}", frame.id));
    }

    fn updated(&self, frame: &Arc<DocumentFrame>) {
        record(format!("updated document {}", frame.id));
    }
}

type DocumentView = FrameLayout<DocumentContent>;

struct OutlineContent;

impl FrameContent for OutlineContent {
    type Frame = OutlineFrame;

    fn create(_context: &DisplayContext) -> Result<Self, BoxError> {
        record("create outline");
        Ok(OutlineContent)
    }
}

type OutlineView = FrameLayout<OutlineContent>;

/// Implements the frame-backed contract by hand and records each step.
struct TracedOutlineView {
    frame: OnceLock<Arc<OutlineFrame>>,
    subscription: Mutex<Option<Subscription>>,
}

impl View for TracedOutlineView {
    fn attached(self: Arc<Self>) -> PilotResult<()> {
        let frame = self.frame.get().cloned().ok_or(UsageError::AttachedWithoutFrame {
            view: "TracedOutlineView",
        })?;
        record("attached");
        let observer: Weak<dyn FrameObserver> = Arc::downgrade(&self) as Weak<dyn FrameObserver>;
        *self.subscription.lock() = Some(frame.observers().subscribe(observer, true));
        Ok(())
    }

    fn detached(&self) {
        record("detached");
        self.subscription.lock().take();
    }
}

impl FrameObserver for TracedOutlineView {
    fn updated(&self) {
        record("updated");
    }
}

impl FrameBackedView for TracedOutlineView {
    type Frame = OutlineFrame;

    fn set_backing_frame(&self, frame: Arc<OutlineFrame>) -> PilotResult<&Self> {
        record("set_backing_frame");
        self.frame
            .set(frame)
            .map_err(|_| UsageError::AlreadyBound { view: "TracedOutlineView" })?;
        Ok(self)
    }

    fn backing_frame(&self) -> Option<Arc<OutlineFrame>> {
        self.frame.get().cloned()
    }

    fn backing_frame_set(&self, _frame: &Arc<OutlineFrame>) {
        record("backing_frame_set");
    }
}

impl CreateView for TracedOutlineView {
    fn create(_context: &DisplayContext) -> Result<Self, BoxError> {
        record("create");
        Ok(Self {
            frame: OnceLock::new(),
            subscription: Mutex::new(None),
        })
    }
}

struct Placeholder;
impl View for Placeholder {}

// ============================================================================
// Display strategy double
// ============================================================================

/// Wraps the default strategy and records every call the handler makes.
struct RecordingDisplayer {
    inner: DefaultDisplayer,
    visibility_queries: Cell<usize>,
    make_visible_calls: usize,
}

impl RecordingDisplayer {
    fn new() -> Self {
        Self {
            inner: DefaultDisplayer::with_root("main"),
            visibility_queries: Cell::new(0),
            make_visible_calls: 0,
        }
    }

    fn calls(&self) -> usize {
        self.visibility_queries.get() + self.make_visible_calls
    }
}

impl Displayer for RecordingDisplayer {
    fn is_view_visible_for_frame_type(&self, frame_type: FrameType) -> bool {
        self.visibility_queries.set(self.visibility_queries.get() + 1);
        self.inner.is_view_visible_for_frame_type(frame_type)
    }

    fn make_visible(&mut self, view: Arc<dyn View>, frame_type: FrameType) -> PilotResult<()> {
        record("make_visible");
        self.make_visible_calls += 1;
        self.inner.make_visible(view, frame_type)
    }

    fn display_context(&self) -> DisplayContext {
        self.inner.display_context()
    }

    fn clear_all(&mut self) {
        record("clear_all");
        self.inner.clear_all();
    }
}

fn handler() -> ConfigResult<FrameViewHandler<RecordingDisplayer>> {
    FrameViewHandler::new(
        [ViewClass::of::<DocumentView>(), ViewClass::of::<OutlineView>()],
        RecordingDisplayer::new(),
    )
}

fn current_document(handler: &FrameViewHandler<RecordingDisplayer>) -> Option<Arc<DocumentFrame>> {
    let view = handler.displayer().inner.current_view()?;
    view.downcast_ref::<DocumentView>()?.backing_frame()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_unmapped_frame_is_declined() {
    let mut handler = FrameViewHandler::new(
        [ViewClass::of::<OutlineView>()],
        RecordingDisplayer::new(),
    )
    .unwrap();
    take_events();

    let frame: Arc<dyn Frame> = DocumentFrame::new(1);
    assert!(!handler.present_if_handled(&frame).unwrap());
    assert_eq!(handler.displayer().calls(), 0);
    assert!(take_events().is_empty());
}

#[test]
fn test_construction_order() {
    init_tracing();
    let mut handler = FrameViewHandler::new(
        [ViewClass::of::<TracedOutlineView>()],
        RecordingDisplayer::new(),
    )
    .unwrap();

    let frame: Arc<dyn Frame> = OutlineFrame::new();
    assert!(handler.present_if_handled(&frame).unwrap());
    assert_eq!(
        take_events(),
        vec![
            "create",
            "set_backing_frame",
            "backing_frame_set",
            "make_visible",
            "attached",
            "updated",
        ]
    );
}

#[test]
fn test_already_visible_type_is_not_rebuilt() {
    let mut handler = handler().unwrap();
    let frame: Arc<dyn Frame> = DocumentFrame::new(1);

    assert!(handler.present_if_handled(&frame).unwrap());
    take_events();

    assert!(handler.present_if_handled(&frame).unwrap());
    assert!(take_events().is_empty());
    assert_eq!(handler.displayer().make_visible_calls, 1);
}

#[test]
fn test_present_is_idempotent() {
    let mut handler = handler().unwrap();
    let frame: Arc<dyn Frame> = DocumentFrame::new(7);

    handler.present_if_handled(&frame).unwrap();
    handler.present_if_handled(&frame).unwrap();

    let creations = take_events()
        .iter()
        .filter(|event| event.starts_with("create"))
        .count();
    assert_eq!(creations, 1);
}

#[test]
fn test_hand_written_view_is_built_once() {
    let mut handler = FrameViewHandler::new(
        [ViewClass::of::<TracedOutlineView>()],
        RecordingDisplayer::new(),
    )
    .unwrap();
    let frame: Arc<dyn Frame> = OutlineFrame::new();

    for _ in 0..3 {
        assert!(handler.present_if_handled(&frame).unwrap());
    }

    let events = take_events();
    assert_eq!(events.iter().filter(|event| *event == "create").count(), 1);
    assert_eq!(handler.displayer().make_visible_calls, 1);
    assert!(handler.displayer().is_view_visible_for_frame_type(FrameType::of::<OutlineFrame>()));
}

#[test]
fn test_new_view_uses_displayer_context() {
    let mut handler = handler().unwrap();
    let frame: Arc<dyn Frame> = DocumentFrame::new(3);
    handler.present_if_handled(&frame).unwrap();

    assert_eq!(
        take_events(),
        vec![
            "create document in main",
            "bound document 3",
            "make_visible",
            "updated document 3",
        ]
    );
}

#[test]
fn test_same_type_different_instance_keeps_first_binding() {
    let mut handler = handler().unwrap();
    let first = DocumentFrame::new(1);
    let second = DocumentFrame::new(2);

    let frame: Arc<dyn Frame> = first.clone();
    assert!(handler.present_if_handled(&frame).unwrap());
    let visible = handler.displayer().inner.current_view().unwrap();
    assert_eq!(current_document(&handler).unwrap().id, 1);

    // Matching is by frame type only: the second instance is not rebound.
    let frame: Arc<dyn Frame> = second.clone();
    assert!(handler.present_if_handled(&frame).unwrap());
    assert_eq!(current_document(&handler).unwrap().id, 1);
    assert!(Arc::ptr_eq(&visible, &handler.displayer().inner.current_view().unwrap()));
    assert_eq!(second.observers().observer_count(), 0);
    assert_eq!(handler.displayer().make_visible_calls, 1);
}

#[test]
fn test_switching_types_swaps_views() {
    let mut handler = handler().unwrap();
    let document: Arc<dyn Frame> = DocumentFrame::new(1);
    let outline: Arc<dyn Frame> = OutlineFrame::new();

    handler.present_if_handled(&document).unwrap();
    handler.present_if_handled(&outline).unwrap();

    let displayer = handler.displayer();
    assert_eq!(displayer.inner.root().child_count(), 1);
    assert!(displayer.is_view_visible_for_frame_type(FrameType::of::<OutlineFrame>()));
    assert!(!displayer.is_view_visible_for_frame_type(FrameType::of::<DocumentFrame>()));
    assert_eq!(displayer.make_visible_calls, 2);
}

#[test]
fn test_clear_all_hides_every_type() {
    let mut handler = handler().unwrap();
    let frame: Arc<dyn Frame> = DocumentFrame::new(1);
    handler.present_if_handled(&frame).unwrap();

    handler.clear_all();
    let displayer = handler.displayer();
    assert!(!displayer.is_view_visible_for_frame_type(FrameType::of::<DocumentFrame>()));
    assert!(!displayer.is_view_visible_for_frame_type(FrameType::of::<OutlineFrame>()));

    // Presenting again after a clear builds a fresh view.
    take_events();
    handler.present_if_handled(&frame).unwrap();
    assert!(take_events().contains(&"create document in main".to_string()));
}

#[test]
fn test_clear_all_on_unused_handler() {
    let mut handler = handler().unwrap();
    handler.clear_all();
    handler.clear_all();
    assert!(handler.displayer().inner.current_view().is_none());
}

#[test]
fn test_subscriptions_balance_across_swaps() {
    init_tracing();
    let mut handler = handler().unwrap();
    let document = DocumentFrame::new(1);
    let document_dyn: Arc<dyn Frame> = document.clone();
    let outline: Arc<dyn Frame> = OutlineFrame::new();

    handler.present_if_handled(&document_dyn).unwrap();
    handler.present_if_handled(&outline).unwrap();
    handler.present_if_handled(&document_dyn).unwrap();
    assert_eq!(document.observers().observer_count(), 1);

    handler.clear_all();
    assert_eq!(document.observers().subscription_count(), 2);
    assert_eq!(document.observers().release_count(), 2);
    assert_eq!(document.observers().observer_count(), 0);
}

#[test]
fn test_updates_reach_only_the_visible_view() {
    let mut handler = handler().unwrap();
    let document = DocumentFrame::new(4);
    let document_dyn: Arc<dyn Frame> = document.clone();
    let outline: Arc<dyn Frame> = OutlineFrame::new();

    handler.present_if_handled(&document_dyn).unwrap();
    take_events();
    document_dyn.notify_updated();
    assert_eq!(take_events(), vec!["updated document 4"]);

    handler.present_if_handled(&outline).unwrap();
    take_events();
    assert_eq!(document.observers().notify_updated(), 0);
    assert!(take_events().is_empty());
}

#[test]
fn test_class_without_frame_parameter_fails_construction() {
    let err = FrameViewHandler::new(
        [
            ViewClass::of::<DocumentView>(),
            ViewClass::declared::<Placeholder>(Backing::Undeclared),
        ],
        DefaultDisplayer::with_root("main"),
    )
    .unwrap_err();

    // The missing contract is reported, not the missing frame parameter.
    assert!(matches!(err, ConfigError::NotFrameBacked { view } if view.ends_with("Placeholder")));
    assert!(PilotError::from(err).is_configuration());
}

#[test]
fn test_class_with_unbound_parameter_fails_construction() {
    let generic = ViewClass::declared::<Placeholder>(Backing::Unbound("F"));
    let err = FrameViewHandler::new(
        [ViewClass::declared::<Placeholder>(Backing::Undeclared).extending(generic)],
        DefaultDisplayer::with_root("main"),
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::NotFrameBacked { .. }));
}

#[test]
fn test_translucent_frames() {
    let mut handler = handler().unwrap();
    handler.mark_translucent::<OutlineFrame>();

    let document: Arc<dyn Frame> = DocumentFrame::new(1);
    let outline: Arc<dyn Frame> = OutlineFrame::new();
    assert!(handler.is_frame_opaque(document.as_ref()));
    assert!(!handler.is_frame_opaque(outline.as_ref()));
}
