//! Integration tests for frame observer lists.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

use horizon_pilot_core::{downcast_frame, Frame, FrameError, FrameObserver, FrameObservers, FrameType};

struct PlaylistFrame {
    observers: FrameObservers,
    tracks: parking_lot::Mutex<Vec<String>>,
}

impl PlaylistFrame {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            observers: FrameObservers::new(),
            tracks: parking_lot::Mutex::new(Vec::new()),
        })
    }

    fn add_track(&self, name: &str) {
        self.tracks.lock().push(name.to_string());
        self.observers.notify_updated();
    }
}

impl Frame for PlaylistFrame {
    fn observers(&self) -> &FrameObservers {
        &self.observers
    }
}

#[derive(Debug)]
struct QueueFrame {
    observers: FrameObservers,
}

impl Frame for QueueFrame {
    fn observers(&self) -> &FrameObservers {
        &self.observers
    }
}

#[derive(Default)]
struct TrackCounter {
    updates: AtomicUsize,
}

impl FrameObserver for TrackCounter {
    fn updated(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }
}

fn observe(counter: &Arc<TrackCounter>) -> Weak<dyn FrameObserver> {
    Arc::downgrade(counter) as Weak<dyn FrameObserver>
}

/// Route `tracing` output through the test harness; `RUST_LOG` selects targets.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_observers_follow_frame_changes() {
    init_tracing();
    let frame = PlaylistFrame::new();
    let counter = Arc::new(TrackCounter::default());

    let subscription = frame.observers().subscribe(observe(&counter), true);
    frame.add_track("intro");
    frame.add_track("outro");
    assert_eq!(counter.updates.load(Ordering::SeqCst), 3);

    subscription.release();
    frame.add_track("bonus");
    assert_eq!(counter.updates.load(Ordering::SeqCst), 3);
    assert_eq!(frame.tracks.lock().len(), 3);
}

#[test]
fn test_notify_from_another_thread() {
    init_tracing();
    let frame = PlaylistFrame::new();
    let counter = Arc::new(TrackCounter::default());
    let _subscription = frame.observers().subscribe(observe(&counter), false);

    let worker = {
        let frame = frame.clone();
        thread::spawn(move || {
            for i in 0..10 {
                frame.add_track(&format!("track {i}"));
            }
        })
    };
    worker.join().unwrap();

    assert_eq!(counter.updates.load(Ordering::SeqCst), 10);
}

#[test]
fn test_subscription_outliving_frame() {
    let counter = Arc::new(TrackCounter::default());
    let subscription = {
        let frame = PlaylistFrame::new();
        frame.observers().subscribe(observe(&counter), false)
    };

    assert!(subscription.is_active());
    assert!(!subscription.release());
}

#[test]
fn test_blocked_list_skips_observers() {
    let frame = PlaylistFrame::new();
    let counter = Arc::new(TrackCounter::default());
    let _subscription = frame.observers().subscribe(observe(&counter), false);

    frame.observers().set_blocked(true);
    frame.add_track("hidden");
    frame.observers().set_blocked(false);
    frame.add_track("shown");

    assert_eq!(counter.updates.load(Ordering::SeqCst), 1);
}

#[test]
fn test_frame_identity_through_dyn() {
    let playlist: Arc<dyn Frame> = PlaylistFrame::new();
    assert_eq!(playlist.frame_type(), FrameType::of::<PlaylistFrame>());
    assert!(playlist.is::<PlaylistFrame>());
    assert!(playlist.downcast_ref::<QueueFrame>().is_none());

    let err = downcast_frame::<QueueFrame>(playlist.clone()).unwrap_err();
    assert!(matches!(err, FrameError::TypeMismatch { .. }));
    assert!(downcast_frame::<PlaylistFrame>(playlist).is_ok());
}
