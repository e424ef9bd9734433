// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS value formatting.

use alloc::format;
use alloc::string::String;

use kurbo::Affine;

use vitrine_core::notify::NoticeKind;
use vitrine_core::time::Duration;

/// Formats a 2D affine as a CSS `matrix()` value.
pub(crate) fn matrix(xf: Affine) -> String {
    let [a, b, c, d, e, f] = xf.as_coeffs();
    format!("matrix({a},{b},{c},{d},{e},{f})")
}

/// Width in percent.
pub(crate) fn percent(width: f64) -> String {
    format!("{width}%")
}

/// The hero entrance animation with its per-element delay.
pub(crate) fn entrance_animation(delay: Duration) -> String {
    format!("slideInLeft 1s ease {}s both", delay.as_secs_f64())
}

/// Fade-in applied to filter items as they are shown.
pub(crate) const FILTER_FADE_IN: &str = "fadeIn 0.5s ease";

/// Border color of a field with an error.
pub(crate) const ERROR_BORDER: &str = "#ff6b6b";

/// Inline style of a field's error message.
pub(crate) const ERROR_MESSAGE_STYLE: &str =
    "color: #ff6b6b; font-size: 0.875rem; margin-top: 0.25rem; display: block;";

/// Submit button contents while a submission is pending.
pub(crate) const SENDING_HTML: &str = "<i class=\"fas fa-spinner fa-spin\"></i> Sending...";

/// Inline style of a notice toast, off-screen.
pub(crate) const NOTICE_STYLE: &str = "position: fixed; top: 20px; right: 20px; \
     padding: 1rem 1.5rem; border-radius: 0.5rem; color: white; font-weight: 500; \
     z-index: 10000; transform: translateX(400px); transition: transform 0.3s ease; \
     max-width: 300px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);";

/// Notice transform when on screen.
pub(crate) const NOTICE_SHOWN: &str = "translateX(0)";

/// Notice transform when off screen.
pub(crate) const NOTICE_HIDDEN: &str = "translateX(400px)";

/// Background color for each notice flavour.
pub(crate) fn notice_background(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "#10b981",
        NoticeKind::Error => "#ef4444",
        NoticeKind::Info => "#3b82f6",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_scale_formats_as_matrix() {
        assert_eq!(
            matrix(Affine::scale_non_uniform(0.25, 1.0)),
            "matrix(0.25,0,0,1,0,0)"
        );
    }

    #[test]
    fn parallax_translation_formats_as_matrix() {
        assert_eq!(
            matrix(Affine::translate((0.0, -40.0))),
            "matrix(1,0,0,1,0,-40)"
        );
    }

    #[test]
    fn entrance_delay_in_seconds() {
        assert_eq!(
            entrance_animation(Duration(400)),
            "slideInLeft 1s ease 0.4s both"
        );
        assert_eq!(percent(90.0), "90%");
    }
}
