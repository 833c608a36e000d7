use glam::Vec2;

/// Logo offset for a cursor over a card.
///
/// The cursor position is mapped to `[-0.5, 0.5]` on both axes relative to
/// the card center and scaled by `strength`. Positions outside the card are
/// clamped to its edges; degenerate rects yield no offset.
pub fn parallax_offset(cursor: Vec2, rect_origin: Vec2, rect_size: Vec2, strength: f32) -> Vec2 {
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    let centered = (cursor - rect_origin) / rect_size - Vec2::splat(0.5);
    centered.clamp(Vec2::splat(-0.5), Vec2::splat(0.5)) * strength
}

/// CSS `transform` value for an offset.
pub fn translate_css(offset: Vec2) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vec2 = Vec2::new(100.0, 50.0);
    const SIZE: Vec2 = Vec2::new(200.0, 100.0);

    #[test]
    fn center_has_no_offset() {
        let center = ORIGIN + SIZE / 2.0;
        assert_eq!(parallax_offset(center, ORIGIN, SIZE, 10.0), Vec2::ZERO);
    }

    #[test]
    fn corners_hit_half_strength() {
        assert_eq!(parallax_offset(ORIGIN, ORIGIN, SIZE, 10.0), Vec2::new(-5.0, -5.0));
        assert_eq!(
            parallax_offset(ORIGIN + SIZE, ORIGIN, SIZE, 10.0),
            Vec2::new(5.0, 5.0)
        );
    }

    #[test]
    fn outside_cursor_is_clamped() {
        let far = ORIGIN + SIZE * 3.0;
        assert_eq!(parallax_offset(far, ORIGIN, SIZE, 10.0), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn zero_size_rect_is_inert() {
        assert_eq!(
            parallax_offset(Vec2::new(3.0, 4.0), ORIGIN, Vec2::new(0.0, 100.0), 10.0),
            Vec2::ZERO
        );
    }

    #[test]
    fn css_formatting() {
        assert_eq!(translate_css(Vec2::ZERO), "translate(0px, 0px)");
        assert_eq!(translate_css(Vec2::new(-2.5, 4.0)), "translate(-2.5px, 4px)");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_stays_within_half_strength(
                cx in -1000.0f32..1000.0,
                cy in -1000.0f32..1000.0,
                w in 1.0f32..800.0,
                h in 1.0f32..800.0,
                strength in 0.0f32..40.0,
            ) {
                let offset = parallax_offset(Vec2::new(cx, cy), Vec2::ZERO, Vec2::new(w, h), strength);
                let bound = strength / 2.0 + 1e-4;
                prop_assert!(offset.x.abs() <= bound);
                prop_assert!(offset.y.abs() <= bound);
            }
        }
    }
}
