use super::*;

use crate::{
    animation::keyframe::Keyframe,
    animation::value::TransformValue,
    foundation::core::CanvasSize,
    svg::groups::decompose,
    toolkit::stage::Stage,
};

const FIGURE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
  <g id="arm"><rect x="20" y="40" width="60" height="20"/></g>
</svg>"##;

fn setup() -> (Stage, TransformGroup) {
    let mut stage = Stage::new(CanvasSize::default());
    let root = stage.document().root();
    let svg = stage.load(root, FIGURE.as_bytes()).unwrap();
    let arm = stage.select(svg, "#arm").unwrap().unwrap();
    let groups = decompose(stage.document_mut(), arm).unwrap().unwrap();
    (stage, groups)
}

fn rotate_track() -> KeyframeTrack {
    KeyframeTrack::new(
        Axis::Rotate,
        &[
            Keyframe {
                step: 2,
                angle: Some(10.0),
                ..Keyframe::default()
            },
            Keyframe {
                step: 5,
                angle: Some(40.0),
                ..Keyframe::default()
            },
        ],
    )
    .unwrap()
}

#[test]
fn construction_snaps_group_to_first_pose_about_bbox_center() {
    let (mut stage, groups) = setup();
    let tween = Tween::new(&mut stage, TweenId(0), &groups, rotate_track(), 100.0).unwrap();
    assert_eq!(tween.state(), TweenState::Ready);
    assert_eq!(tween.group(), groups.rotate);
    assert_eq!(tween.element(), groups.element);

    let value = stage.transform(groups.rotate).unwrap();
    let TransformValue::Rotate { angle, cx, cy } = value else {
        panic!("expected rotate, got {value:?}");
    };
    assert_eq!(angle, 10.0);
    assert!((cx - 50.0).abs() < 1e-3);
    assert!((cy - 50.0).abs() < 1e-3);
    assert!(stage.transform(groups.translate).is_none());
}

#[test]
fn steps_pause_then_animate_then_finish() {
    let (mut stage, groups) = setup();
    let mut tween = Tween::new(&mut stage, TweenId(0), &groups, rotate_track(), 100.0).unwrap();

    let first = tween.advance(&mut stage).unwrap();
    assert_eq!(first.kind, StepKind::Pause);
    assert_eq!(stage.next_deadline(), Some(200.0));
    assert_eq!(tween.state(), TweenState::Running { index: 0 });
    assert_eq!(tween.started_at_ms(), Some(0.0));

    stage.advance_to(200.0);
    let second = tween.advance(&mut stage).unwrap();
    assert_eq!(second.kind, StepKind::Animate);
    assert_eq!(second.duration_ms, 300.0);
    assert_eq!(stage.next_deadline(), Some(500.0));

    stage.advance_to(500.0);
    assert!(tween.advance(&mut stage).is_none());
    assert_eq!(tween.state(), TweenState::Finished);
    assert!(tween.advance(&mut stage).is_none());
    assert_eq!(stage.next_deadline(), None);
}

#[test]
fn cancel_is_terminal() {
    let (mut stage, groups) = setup();
    let mut tween = Tween::new(&mut stage, TweenId(3), &groups, rotate_track(), 100.0).unwrap();
    tween.advance(&mut stage);
    stage.advance_to(200.0);
    tween.advance(&mut stage);
    stage.advance_to(300.0);

    assert!(tween.cancel(&mut stage));
    assert_eq!(tween.state(), TweenState::Cancelled);
    assert_eq!(stage.take_cancelled(), vec![TweenId(3)]);
    assert!(!tween.cancel(&mut stage));
    assert!(tween.advance(&mut stage).is_none());
}

#[test]
fn cancel_during_first_pause_drops_its_timer() {
    let (mut stage, groups) = setup();
    let mut tween = Tween::new(&mut stage, TweenId(1), &groups, rotate_track(), 100.0).unwrap();
    tween.advance(&mut stage);
    assert_eq!(stage.pending_timers(), 1);
    stage.advance_to(50.0);

    assert!(tween.cancel(&mut stage));
    assert_eq!(stage.pending_timers(), 0);
    assert_eq!(stage.next_deadline(), None);
    assert_eq!(stage.take_cancelled(), vec![TweenId(1)]);
    assert!(stage.advance_to(1000.0).is_empty());
}

#[test]
fn schedule_matches_player_plan() {
    let (mut stage, groups) = setup();
    let tween = Tween::new(&mut stage, TweenId(0), &groups, rotate_track(), 100.0).unwrap();
    let plan: Vec<(f64, f64)> = tween
        .schedule()
        .iter()
        .map(|s| (s.start_ms, s.end_ms))
        .collect();
    assert_eq!(plan, vec![(0.0, 200.0), (200.0, 500.0)]);
}
