// ============================================================================
// VALUE ANIMATION
// ============================================================================
//
// Time-based interpolation of the displayed gauge value.
//
// `Tween` is the explicit animation state: `retarget` starts a new
// animation from whatever is currently displayed, `advance` moves it to a
// point in time. `AnimationDriver` couples a tween to a `FrameHost` and
// keeps at most one frame request outstanding.

use std::time::{Duration, Instant};

use log::{debug, trace};

/// Maps linear progress in `[0, 1]` to eased progress.
pub type EasingFn = fn(f64) -> f64;

pub fn linear(p: f64) -> f64 {
    p
}

/// Quadratic ease-out: fast start, gentle landing.
pub fn ease_out_quad(p: f64) -> f64 {
    p * (2.0 - p)
}

pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Animating { from: f64, started: Instant },
}

#[derive(Debug, Clone)]
pub struct Tween {
    displayed: f64,
    target: f64,
    duration: Duration,
    easing: EasingFn,
    phase: Phase,
}

impl Tween {
    /// A settled tween showing `value`.
    pub fn new(value: f64, duration: Duration, easing: EasingFn) -> Self {
        Self {
            displayed: value,
            target: value,
            duration,
            easing,
            phase: Phase::Idle,
        }
    }

    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Animating { .. })
    }

    /// A zero duration also settles any animation in flight.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
        if duration.is_zero() {
            self.finish();
        }
    }

    pub fn set_easing(&mut self, easing: EasingFn) {
        self.easing = easing;
    }

    /// Starts animating towards `value`, superseding any animation in flight.
    ///
    /// The new animation starts from the value displayed at `now`. With a
    /// zero duration the displayed value jumps to `value` immediately, and
    /// so does any step into or out of a non-finite value.
    pub fn retarget(&mut self, value: f64, now: Instant) {
        if value == self.target || (value.is_nan() && self.target.is_nan()) {
            return;
        }

        if self.duration.is_zero() {
            self.target = value;
            self.finish();
            return;
        }

        let from = self.advance(now);
        self.target = value;
        if !from.is_finite() || !value.is_finite() {
            debug!("non-finite step {from} -> {value}, settling");
            self.finish();
            return;
        }
        if from == value {
            self.phase = Phase::Idle;
            return;
        }

        debug!("retarget {from} -> {value} over {:?}", self.duration);
        self.phase = Phase::Animating { from, started: now };
    }

    /// Moves the animation to `now` and returns the displayed value.
    ///
    /// Once the full duration has elapsed the target is returned exactly.
    pub fn advance(&mut self, now: Instant) -> f64 {
        if let Phase::Animating { from, started } = self.phase {
            let elapsed = now.saturating_duration_since(started);
            let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
            if progress >= 1.0 {
                debug!("tween settled at {}", self.target);
                self.finish();
            } else {
                let eased = (self.easing)(progress);
                self.displayed = from + eased * (self.target - from);
                trace!("tween progress {progress:.3} -> {}", self.displayed);
            }
        }
        self.displayed
    }

    /// Jumps straight to the target.
    pub fn finish(&mut self) {
        self.displayed = self.target;
        self.phase = Phase::Idle;
    }
}

/// Identifies one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's "run again before the next paint" facility.
pub trait FrameHost {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Drives a [`Tween`] one host frame at a time.
///
/// Frames are requested only while the tween is running. A new value cancels
/// the outstanding request before scheduling a fresh one, and dropping the
/// driver cancels whatever is still pending.
pub struct AnimationDriver<H: FrameHost> {
    tween: Tween,
    host: H,
    pending: Option<FrameHandle>,
}

impl<H: FrameHost> AnimationDriver<H> {
    pub fn new(tween: Tween, host: H) -> Self {
        Self {
            tween,
            host,
            pending: None,
        }
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn displayed(&self) -> f64 {
        self.tween.displayed()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn set_value(&mut self, value: f64, now: Instant) {
        self.cancel_pending();
        self.tween.retarget(value, now);
        self.schedule_if_running();
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.tween.set_duration(duration);
        if !self.tween.is_running() {
            self.cancel_pending();
        }
    }

    pub fn set_easing(&mut self, easing: EasingFn) {
        self.tween.set_easing(easing);
    }

    /// Runs the step for frame `handle`. Returns `None` for a handle that is
    /// no longer the outstanding request.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) -> Option<f64> {
        if self.pending != Some(handle) {
            trace!("ignoring stale frame {handle:?}");
            return None;
        }
        self.pending = None;
        let value = self.tween.advance(now);
        self.schedule_if_running();
        Some(value)
    }

    fn schedule_if_running(&mut self) {
        if self.tween.is_running() && self.pending.is_none() {
            self.pending = Some(self.host.request_frame());
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
    }
}

impl<H: FrameHost> Drop for AnimationDriver<H> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
