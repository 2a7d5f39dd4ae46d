//! # Fixed-Cadence Animation
//!
//! A blocking frame loop that drives a user callback against any
//! [`Renderer`] at a target frame time. The loop owns the frame lifecycle:
//! it clears the buffer before each callback, flushes after it, and sleeps
//! out whatever is left of the frame budget. The callback only draws.
//!
//! ## Stopping
//!
//! The callback returns a [`FrameControl`] inside the usual `Result`:
//! [`FrameControl::Stop`] ends the loop as a normal, successful return,
//! while an `Err` ends it and propagates. Stopping is control flow, not a
//! failure, which is why it is not modeled as an error value.
//!
//! There is no external cancellation: a flush or blocking read already in
//! progress cannot be interrupted, and the loop only checks for the stop
//! signal at the top of the next frame.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::MatrizError;
use crate::matrix::Renderer;

/// Frame time for 60 fps animation
pub const FRAME_TIME_60FPS: Duration = Duration::from_millis(17);

/// Frame time for 30 fps animation
pub const FRAME_TIME_30FPS: Duration = Duration::from_millis(33);

/// Frame time for 24 fps animation
pub const FRAME_TIME_24FPS: Duration = Duration::from_millis(42);

/// What the frame callback wants the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Flush this frame and keep going
    Continue,
    /// End the animation; the loop returns `Ok` without flushing this frame
    Stop,
}

/// Run an animation on `renderer`, invoking `render` once per frame.
///
/// Each iteration:
///
/// 1. clears the renderer's buffer
/// 2. calls `render` with the time elapsed since the previous frame started
///    (the first frame measures against the loop's own start, so it sees a
///    near-zero value)
/// 3. flushes the renderer
/// 4. sleeps for whatever remains of `frame_time`
///
/// Do not call `flush` inside the callback; the loop flushes exactly once
/// per frame after the callback returns [`FrameControl::Continue`].
///
/// Returns `Ok(())` when the callback asks to stop. Any error from the
/// callback or from flushing ends the loop and propagates.
///
/// ## Example
///
/// ```no_run
/// use matriz::animation::{self, FrameControl};
/// use matriz::graphics::draw_line;
/// use matriz::matrix::BwMatrix;
///
/// let mut matrix = BwMatrix::open("/dev/ttyACM0", 115_200)?;
/// let mut frame = 0;
///
/// animation::animate(&mut matrix, |m, _elapsed| {
///     if frame == 340 {
///         return Ok(FrameControl::Stop);
///     }
///     draw_line(m, 0, frame % 34, 8, frame % 34);
///     frame += 1;
///     Ok(FrameControl::Continue)
/// }, animation::FRAME_TIME_30FPS)?;
/// # Ok::<(), matriz::error::MatrizError>(())
/// ```
pub fn animate<R, F>(
    renderer: &mut R,
    mut render: F,
    frame_time: Duration,
) -> Result<(), MatrizError>
where
    R: Renderer,
    F: FnMut(&mut R, Duration) -> Result<FrameControl, MatrizError>,
{
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let elapsed = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        renderer.clear();
        match render(renderer, elapsed)? {
            FrameControl::Stop => return Ok(()),
            FrameControl::Continue => {}
        }

        renderer.flush()?;

        let spent = frame_start.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
