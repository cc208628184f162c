//! Timed playback of a traversal.

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::events::MonitorStatus;
use crate::playback::{Playback, PlaybackStatus};
use crate::simulation::AnimationFrame;

/// Play a traversal to the end, handing each frame to `on_frame` at the
/// playback's frame interval.
///
/// Frames are pulled one per tick, so a slow consumer delays the animation
/// rather than piling up frames. At maximum speed the loop only yields
/// between frames. Returns the delivery notice once the sequence is
/// exhausted; a zero-hop traversal is delivered without any frames.
pub async fn drive<F>(playback: &mut Playback, mut on_frame: F) -> Result<MonitorStatus>
where
    F: FnMut(&AnimationFrame),
{
    let period = playback
        .interval()
        .ok_or_else(|| Error::InvalidConfig("cannot drive a paused playback".into()))?;

    playback.play();
    info!(
        path = %playback.simulator().path(),
        frames = playback.total_frames(),
        interval_ms = period.as_millis() as u64,
        "Traversal started"
    );

    let mut ticker = (!period.is_zero()).then(|| {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    while !playback.is_finished() {
        match ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => tokio::task::yield_now().await,
        }

        let Some(frame) = playback.step_forward() else {
            break;
        };
        debug!(frame = frame.index, hop = %frame.hop_label(), "Frame");
        on_frame(&frame);
    }

    let report = PlaybackStatus::from(&*playback);
    let path = playback.simulator().path();
    let status = MonitorStatus::delivered(path, playback.elapsed());
    info!(
        source = %path.source(),
        destination = %path.destination(),
        frames = report.current_frame,
        speed = %report.speed,
        elapsed_ms = playback.elapsed().as_millis() as u64,
        "Packet delivered"
    );
    Ok(status)
}
