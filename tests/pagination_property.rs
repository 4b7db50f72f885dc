// Property tests for the detail-window pagination rules

use framesight::{FrameRange, SessionStatistics};
use proptest::prelude::*;

proptest! {
    /// Arbitrary jump sequences never push the window outside the session.
    #[test]
    fn frame_range_stays_clamped(
        frame_count in 1usize..20_000,
        jumps in proptest::collection::vec(any::<bool>(), 0..64),
    ) {
        let mut range = FrameRange::new(frame_count);
        for forward in jumps {
            if forward {
                range.jump_forward(frame_count);
            } else {
                range.jump_backward(frame_count);
            }
            prop_assert!(range.end <= frame_count - 1);
            prop_assert!(range.start <= range.end);
        }
    }

    /// Jumping forward then backward the same number of times returns to
    /// the initial window unless the forward walk hit the end.
    #[test]
    fn forward_then_backward_returns_home(frame_count in 2_000usize..50_000) {
        let initial = FrameRange::new(frame_count);
        let mut range = initial;
        range.jump_forward(frame_count);
        range.jump_backward(frame_count);
        prop_assert_eq!(range, initial);
    }

    /// Miss counters never exceed the frame count, so the stacked chart's
    /// percentages always stay in range.
    #[test]
    fn miss_counts_bounded_by_frame_count(
        flags in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..500),
    ) {
        let app: Vec<bool> = flags.iter().map(|(a, _)| *a).collect();
        let warp: Vec<bool> = flags.iter().map(|(_, w)| *w).collect();
        let stats = SessionStatistics::compute(&[], &[], &[], &app, &warp);
        prop_assert!(stats.app_misses <= flags.len());
        prop_assert!(stats.warp_misses <= flags.len());
    }
}
