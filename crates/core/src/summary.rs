//! Run summary and attachment probe results.

use crate::frame::ExitReason;
use crate::geometry::offscreen_quad_covers;
use glam::UVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color the offscreen fragment shader writes: opaque blue.
pub const QUAD_COLOR: [u8; 4] = [0, 0, 255, 255];

/// Quantizes a normalized RGBA color to RGBA8 the way a UNORM target stores it.
pub fn quantize_color(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Attachment that the offscreen clear of frame `index` (0-based) lands on.
///
/// The draw-buffer mask is set after the clear and stays on the framebuffer,
/// so the first clear still goes through the default mask to attachment 0.
pub fn cleared_attachment(index: u64) -> usize {
    if index == 0 {
        0
    } else {
        1
    }
}

/// Pixels read back from attachment 1 after the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentProbe {
    /// Size of the attachment the pixels were read from.
    pub size: [u32; 2],
    pub centre: [u8; 4],
    pub corner: [u8; 4],
}

/// One probed pixel that did not hold the expected color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeMismatch {
    pub pixel: [u32; 2],
    pub expected: [u8; 4],
    pub actual: [u8; 4],
}

impl fmt::Display for ProbeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pixel ({}, {}): expected {:?}, got {:?}",
            self.pixel[0], self.pixel[1], self.expected, self.actual
        )
    }
}

impl AttachmentProbe {
    /// The pixels the probe reads: the centre and the origin corner.
    pub fn sample_points(width: u32, height: u32) -> [UVec2; 2] {
        [UVec2::new(width / 2, height / 2), UVec2::ZERO]
    }

    /// The color a probed pixel must hold: the quad color where the
    /// offscreen pass covers it, the clear color elsewhere.
    pub fn expected_at(pixel: UVec2, size: UVec2, clear_color: [f32; 4]) -> [u8; 4] {
        if offscreen_quad_covers(pixel, size) {
            QUAD_COLOR
        } else {
            quantize_color(clear_color)
        }
    }

    /// Compares both probed pixels against what pass A must have produced
    /// after `frames` frames.
    ///
    /// Pixels outside the quad only hold the clear color once some frame's
    /// clear reached attachment 1. Before that they are undefined and are
    /// not compared.
    pub fn mismatches(&self, clear_color: [f32; 4], frames: u64) -> Vec<ProbeMismatch> {
        let size = UVec2::from_array(self.size);
        let [centre, corner] = Self::sample_points(self.size[0], self.size[1]);
        let cleared = (0..frames).any(|i| cleared_attachment(i) == 1);

        [(centre, self.centre), (corner, self.corner)]
            .into_iter()
            .filter(|&(pixel, _)| cleared || offscreen_quad_covers(pixel, size))
            .filter_map(|(pixel, actual)| {
                let expected = Self::expected_at(pixel, size, clear_color);
                (expected != actual).then_some(ProbeMismatch {
                    pixel: pixel.to_array(),
                    expected,
                    actual,
                })
            })
            .collect()
    }
}

/// What a completed run reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// GL version string reported by the driver.
    pub gl_version: String,
    pub frames: u64,
    pub exit_reason: ExitReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<AttachmentProbe>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rendered {} frame(s) on {} ({})",
            self.frames, self.gl_version, self.exit_reason
        )?;
        if let Some(probe) = &self.probe {
            write!(
                f,
                ", attachment 1 centre {:?} corner {:?}",
                probe.centre, probe.corner
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    fn probe(centre: [u8; 4], corner: [u8; 4]) -> AttachmentProbe {
        AttachmentProbe {
            size: [800, 600],
            centre,
            corner,
        }
    }

    #[test]
    fn quantize_rounds_to_nearest_byte() {
        assert_eq!(quantize_color([0.0, 0.5, 1.0, 1.0]), [0, 128, 255, 255]);
        assert_eq!(quantize_color([-1.0, 2.0, 0.2, 0.0]), [0, 255, 51, 0]);
    }

    #[test]
    fn blue_centre_and_clear_corner_match() {
        let p = probe(QUAD_COLOR, [0, 0, 0, 255]);
        assert!(p.mismatches(BLACK, 3).is_empty());
    }

    #[test]
    fn wrong_centre_is_reported() {
        let p = probe([0, 0, 0, 255], [0, 0, 0, 255]);
        let m = p.mismatches(BLACK, 3);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].pixel, [400, 300]);
        assert_eq!(m[0].expected, QUAD_COLOR);
        assert!(m[0].to_string().contains("(400, 300)"), "got: {}", m[0]);
    }

    #[test]
    fn corner_follows_the_configured_clear_color() {
        let grey = [0.5, 0.5, 0.5, 1.0];
        let p = probe(QUAD_COLOR, [128, 128, 128, 255]);
        assert!(p.mismatches(grey, 3).is_empty());
        assert_eq!(p.mismatches(BLACK, 3).len(), 1);
    }

    #[test]
    fn first_clear_misses_attachment_one() {
        assert_eq!(cleared_attachment(0), 0);
        assert_eq!(cleared_attachment(1), 1);
        assert_eq!(cleared_attachment(99), 1);
    }

    #[test]
    fn corner_is_unchecked_after_a_single_frame() {
        let p = probe(QUAD_COLOR, [7, 7, 7, 7]);
        assert!(p.mismatches(BLACK, 1).is_empty());
        assert_eq!(p.mismatches(BLACK, 2).len(), 1);
    }

    #[test]
    fn centre_is_checked_from_the_first_frame() {
        let p = probe([0, 0, 0, 255], [0, 0, 0, 255]);
        assert_eq!(p.mismatches(BLACK, 1).len(), 1);
    }

    #[test]
    fn tiny_targets_expect_quad_color_everywhere_covered() {
        // A 1x1 target's only pixel centre sits at ndc (0, 0).
        let p = AttachmentProbe {
            size: [1, 1],
            centre: QUAD_COLOR,
            corner: QUAD_COLOR,
        };
        assert!(p.mismatches(BLACK, 3).is_empty());
    }

    #[test]
    fn summary_json_skips_missing_probe() {
        let s = RunSummary {
            gl_version: "3.3.0 Core".into(),
            frames: 2,
            exit_reason: ExitReason::FrameLimit,
            probe: None,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("probe"), "got: {json}");
        assert!(json.contains("\"exit_reason\":\"frame-limit\""), "got: {json}");
    }

    #[test]
    fn summary_display_mentions_frames_and_reason() {
        let s = RunSummary {
            gl_version: "3.3.0".into(),
            frames: 7,
            exit_reason: ExitReason::ExitKey,
            probe: Some(probe(QUAD_COLOR, [0, 0, 0, 255])),
        };
        let text = s.to_string();
        assert!(text.contains("7 frame(s)"), "got: {text}");
        assert!(text.contains("exit key"), "got: {text}");
        assert!(text.contains("[0, 0, 255, 255]"), "got: {text}");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn centre_is_covered_and_corner_is_not_for_usable_sizes(
                width in 4u32..4096,
                height in 4u32..4096,
            ) {
                let size = UVec2::new(width, height);
                let [centre, corner] = AttachmentProbe::sample_points(width, height);
                prop_assert!(offscreen_quad_covers(centre, size));
                prop_assert!(!offscreen_quad_covers(corner, size));
            }
        }
    }
}
