// Frame-detail chart: per-frame event timeline for one session
//
// Every frame in the current range becomes a short connected line through
// its recorded events. With tens of thousands of frames in a capture this
// is the one chart that must stay windowed; the range cap keeps the series
// count renderable.

use egui::Color32;

use crate::capture::{EventDataPoint, FrameRange, Session};

use super::reprojections::{APP_MISS_COLOR, WARP_MISS_COLOR};
use super::{AxisBounds, FrameDetailModel, FrameEventSeries};

const FRAME_OK_COLOR: Color32 = Color32::from_rgb(150, 150, 150);

/// Consecutive frames alternate between these two lanes so adjacent event
/// lines do not sit on top of each other.
const LANE_LOW: f64 = 0.35;
const LANE_HIGH: f64 = 0.65;

/// How many leading in-range frames seed the default x-axis window.
const BOUNDS_SEED_FRAMES: usize = 5;
const BOUNDS_PADDING: f64 = 0.1;

/// Builds the event timeline for `session`, windowed to `range`.
pub fn build(session: &Session, session_index: usize, range: FrameRange) -> FrameDetailModel {
    let mut model = FrameDetailModel {
        session_index,
        range,
        frames: Vec::new(),
        vsyncs: Vec::new(),
        bounds: AxisBounds::empty(),
    };
    if session.frame_count() == 0 {
        return model;
    }

    let last = session.frame_count() - 1;
    let start = range.start.min(last);
    let end = range.end.min(last);

    for i in start..=end {
        let lane = if i % 2 == 0 { LANE_LOW } else { LANE_HIGH };
        let mut events = Vec::with_capacity(4);
        push_event(&mut events, session.frame_start[i], lane, "Frame start");
        push_event(&mut events, session.frame_end[i], lane, "Render complete");
        if session.is_vr {
            push_event(
                &mut events,
                session.reprojection_start[i],
                lane,
                "Reprojection start",
            );
            push_event(&mut events, session.reprojection_end[i], lane, "Displayed");
            if session.vsync[i] != 0. {
                model.vsyncs.push(session.vsync[i]);
            }
        }
        if events.is_empty() {
            continue;
        }

        let color = if session.app_missed[i] {
            APP_MISS_COLOR
        } else if session.is_vr && session.warp_missed[i] {
            WARP_MISS_COLOR
        } else {
            FRAME_OK_COLOR
        };
        model.frames.push(FrameEventSeries {
            frame_index: i,
            color,
            events,
        });
    }

    // zoom the default view onto the first few frames of the window
    let mut seed = AxisBounds::empty();
    for frame in model.frames.iter().take(BOUNDS_SEED_FRAMES) {
        for event in &frame.events {
            seed.update(event.x, event.y);
        }
    }
    if seed.is_finite() {
        let span = (seed.max_x - seed.min_x).max(f64::EPSILON);
        model.bounds = AxisBounds {
            min_x: seed.min_x - span * BOUNDS_PADDING,
            max_x: seed.max_x + span * BOUNDS_PADDING,
            min_y: 0.,
            max_y: 1.,
        };
    }

    model
}

fn push_event(events: &mut Vec<EventDataPoint>, timestamp: f64, lane: f64, label: &str) {
    // a zero timestamp means the capture did not record the event
    if timestamp != 0. {
        events.push(EventDataPoint::new(timestamp, lane, label));
    }
}
