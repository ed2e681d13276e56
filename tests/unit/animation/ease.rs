use super::*;

#[test]
fn every_curve_hits_its_endpoints() {
    for ease in Ease::ALL {
        assert!(ease.apply(0.0).abs() < 1e-2, "{} at 0", ease.name());
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{} at 1", ease.name());
    }
}

#[test]
fn names_round_trip_through_lookup() {
    for ease in Ease::ALL {
        assert_eq!(Ease::from_name(ease.name()), Some(ease));
    }
    assert_eq!(Ease::from_name("wobble"), None);
    assert_eq!(Ease::from_name("Linear"), None);
}

#[test]
fn toolkit_curves_match_reference_values() {
    assert_eq!(Ease::Linear.apply(0.25), 0.25);
    assert!((Ease::EaseOut.apply(0.5) - 0.5f64.powf(1.7)).abs() < 1e-12);
    assert!((Ease::EaseIn.apply(0.5) - 0.5f64.powf(0.48)).abs() < 1e-12);
    assert!((Ease::EaseInOut.apply(0.5) - 0.5).abs() < 1e-2);
    assert!(Ease::BackIn.apply(0.2) < 0.0);
    assert!(Ease::BackOut.apply(0.8) > 1.0);
    assert!((Ease::Bounce.apply(0.5) - 0.765625).abs() < 1e-9);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-3.0), 0.0);
    assert_eq!(Ease::InQuad.apply(7.0), 1.0);
}

#[test]
fn serde_uses_table_names() {
    let s = serde_json::to_string(&Ease::EaseInOut).unwrap();
    assert_eq!(s, "\"easeinout\"");
    let back: Ease = serde_json::from_str("\"bounce\"").unwrap();
    assert_eq!(back, Ease::Bounce);
}
