/// Per-frame notifications and frame statistics

use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;
use super::program_uniforms::{FrameQuantity, UniformValue};

/// `frameCounter` wraps at this value
pub const FRAME_COUNTER_WRAP: u32 = 720_720;

/// `frameTimeCounter` wraps at this many seconds
pub const FRAME_TIME_COUNTER_WRAP: f32 = 3600.0;

/// Receives new-frame notifications
pub trait FrameListener: Send + Sync {
    fn on_new_frame(&self);
}

/// Notifies listeners at the start of every rendered frame
///
/// Listeners are held weakly: dropping the last strong reference to a
/// listener unregisters it.
#[derive(Default)]
pub struct FrameUpdateNotifier {
    listeners: Mutex<Vec<Weak<dyn FrameListener>>>,
}

impl FrameUpdateNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, dropping entries whose listener is gone
    pub fn add_listener(&self, listener: &Arc<dyn FrameListener>) {
        if let Ok(mut listeners) = self.listeners.lock() {
            prune_dead(&mut listeners);
            listeners.push(Arc::downgrade(listener));
        }
    }

    /// Called by the host once per frame
    pub fn on_new_frame(&self) {
        let live: Vec<Arc<dyn FrameListener>> = match self.listeners.lock() {
            Ok(mut listeners) => {
                prune_dead(&mut listeners);
                listeners.iter().filter_map(Weak::upgrade).collect()
            }
            Err(_) => return,
        };
        // Lock released before calling out so listeners may register others
        for listener in live {
            listener.on_new_frame();
        }
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|listeners| listeners.iter().filter(|listener| listener.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Registered entries, dead ones included
    #[cfg(test)]
    pub(crate) fn registered_count(&self) -> usize {
        self.listeners.lock().map(|listeners| listeners.len()).unwrap_or(0)
    }
}

fn prune_dead(listeners: &mut Vec<Weak<dyn FrameListener>>) {
    listeners.retain(|listener| listener.strong_count() > 0);
}

#[derive(Debug, Clone, Copy)]
struct FrameStatsState {
    frame_counter: u32,
    frame_time: f32,
    frame_time_counter: f32,
    last_frame: Option<Instant>,
}

/// Frame counter and timers backing `frameCounter`, `frameTime` and `frameTimeCounter`
pub struct FrameStats {
    state: Mutex<FrameStatsState>,
}

impl FrameStats {
    /// Create stats and register them with the notifier
    pub fn attach(notifier: &FrameUpdateNotifier) -> Arc<Self> {
        let stats = Arc::new(Self {
            state: Mutex::new(FrameStatsState {
                frame_counter: 0,
                frame_time: 0.0,
                frame_time_counter: 0.0,
                last_frame: None,
            }),
        });
        let listener: Arc<dyn FrameListener> = stats.clone();
        notifier.add_listener(&listener);
        stats
    }

    pub fn frame_counter(&self) -> u32 {
        self.state.lock().map(|state| state.frame_counter).unwrap_or(0)
    }

    /// Current value of a frame quantity
    pub fn value(&self, quantity: FrameQuantity) -> UniformValue {
        let state = match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        };
        match quantity {
            FrameQuantity::FrameCounter => UniformValue::Int(state.frame_counter as i32),
            FrameQuantity::FrameTime => UniformValue::Float(state.frame_time),
            FrameQuantity::FrameTimeCounter => UniformValue::Float(state.frame_time_counter),
        }
    }
}

impl FrameListener for FrameStats {
    fn on_new_frame(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let now = Instant::now();
        if let Some(last) = state.last_frame {
            state.frame_time = now.duration_since(last).as_secs_f32();
            state.frame_time_counter = (state.frame_time_counter + state.frame_time) % FRAME_TIME_COUNTER_WRAP;
        }
        state.last_frame = Some(now);
        state.frame_counter = (state.frame_counter + 1) % FRAME_COUNTER_WRAP;
    }
}
