/// Tests for blend overrides and alpha tests

use super::*;

fn additive() -> BlendModeOverride {
    BlendModeOverride::Mode(BlendMode::new(
        BlendFactor::SrcAlpha,
        BlendFactor::One,
        BlendFactor::Zero,
        BlendFactor::One,
    ))
}

// ============================================================================
// Tests: Directive parsing
// ============================================================================

#[test]
fn test_blend_override_off() {
    assert_eq!(BlendModeOverride::from_directive("off"), Some(BlendModeOverride::Off));
    assert_eq!(BlendModeOverride::from_directive(" OFF "), Some(BlendModeOverride::Off));
}

#[test]
fn test_blend_override_four_factors() {
    let parsed = BlendModeOverride::from_directive("SRC_ALPHA ONE ZERO ONE");
    assert_eq!(parsed, Some(additive()));
}

#[test]
fn test_blend_override_rejects_wrong_arity() {
    assert!(BlendModeOverride::from_directive("SRC_ALPHA ONE ZERO").is_none());
    assert!(BlendModeOverride::from_directive("SRC_ALPHA ONE ZERO ONE ONE").is_none());
    assert!(BlendModeOverride::from_directive("SRC_ALPHA ONE ZERO BOGUS").is_none());
}

#[test]
fn test_alpha_test_directive() {
    let parsed = AlphaTest::from_directive("GL_GREATER 0.1").unwrap();
    assert_eq!(parsed, AlphaTest::ONE_TENTH_ALPHA);

    let always = AlphaTest::from_directive("GL_ALWAYS").unwrap();
    assert_eq!(always.function, AlphaTestFunction::Always);

    assert!(AlphaTest::from_directive("GL_SOMETIMES 0.5").is_none());
    assert!(AlphaTest::from_directive("GL_LESS abc").is_none());
}

// ============================================================================
// Tests: Alpha test constants and GLSL
// ============================================================================

#[test]
fn test_alpha_test_constants() {
    assert_eq!(AlphaTest::ALWAYS.function, AlphaTestFunction::Always);
    assert_eq!(AlphaTest::ONE_TENTH_ALPHA.function, AlphaTestFunction::Greater);
    assert_eq!(AlphaTest::ONE_TENTH_ALPHA.reference, 0.1);
    assert_eq!(AlphaTest::NON_ZERO_ALPHA.function, AlphaTestFunction::Greater);
    assert!(AlphaTest::NON_ZERO_ALPHA.reference > 0.0);
    assert!(AlphaTest::NON_ZERO_ALPHA.reference < AlphaTest::ONE_TENTH_ALPHA.reference);
}

#[test]
fn test_alpha_test_expression() {
    let expr = AlphaTest::ONE_TENTH_ALPHA.to_expression("color.a", "    ");
    assert_eq!(expr, "    if (!(color.a > 0.1)) {\n        discard;\n    }\n");

    let never = AlphaTest::new(AlphaTestFunction::Never, 0.0).to_expression("color.a", "");
    assert_eq!(never, "discard;\n");

    let always = AlphaTest::ALWAYS.to_expression("color.a", "");
    assert!(always.contains("disabled"));
    assert!(!always.contains("discard"));
}

// ============================================================================
// Tests: Buffer override resolution
// ============================================================================

#[test]
fn test_buffer_overrides_map_to_draw_buffer_position() {
    let resolved = resolve_buffer_overrides(
        &[0, 3, 5],
        &[
            BufferBlendInformation::new(5, additive()),
            BufferBlendInformation::new(3, BlendModeOverride::Off),
        ],
    );

    assert_eq!(resolved, vec![
        BufferBlendOverride::new(2, additive()),
        BufferBlendOverride::new(1, BlendModeOverride::Off),
    ]);
}

#[test]
fn test_buffer_overrides_drop_missing_index() {
    let overrides = [
        BufferBlendInformation::new(0, BlendModeOverride::Off),
        BufferBlendInformation::new(7, BlendModeOverride::Off),
        BufferBlendInformation::new(9, additive()),
    ];
    let resolved = resolve_buffer_overrides(&[0, 1], &overrides);

    assert_eq!(resolved.len(), overrides.len() - 2);
    assert_eq!(resolved[0], BufferBlendOverride::new(0, BlendModeOverride::Off));
}

#[test]
fn test_buffer_overrides_empty_draw_buffers() {
    let resolved = resolve_buffer_overrides(&[], &[BufferBlendInformation::new(0, BlendModeOverride::Off)]);
    assert!(resolved.is_empty());
}
