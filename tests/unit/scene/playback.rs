use super::*;

use crate::{
    animation::keyframe::{Axis, Keyframe, KeyframeTrack},
    foundation::core::CanvasSize,
    svg::groups::decompose,
    toolkit::stage::Stage,
};

const FIGURE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <g id="a"><rect width="10" height="10"/></g>
  <g id="b"><rect width="10" height="10"/></g>
</svg>"##;

fn kf(step: i64, x: f64) -> Keyframe {
    Keyframe {
        step,
        x: Some(x),
        y: Some(0.0),
        ..Keyframe::default()
    }
}

fn playback(tracks: Vec<(&str, Vec<Keyframe>)>) -> (Stage, Playback) {
    let mut stage = Stage::new(CanvasSize::default());
    let root = stage.document().root();
    let svg = stage.load(root, FIGURE.as_bytes()).unwrap();
    let mut tweens = Vec::new();
    for (i, (sel, raw)) in tracks.into_iter().enumerate() {
        let el = stage.select(svg, sel).unwrap().unwrap();
        let groups = decompose(stage.document_mut(), el).unwrap().unwrap();
        let track = KeyframeTrack::new(Axis::Translate, &raw).unwrap();
        tweens.push(Tween::new(&mut stage, TweenId(i), &groups, track, 100.0).unwrap());
    }
    (stage, Playback::new(tweens))
}

#[test]
fn steps_start_at_completion_times() {
    let (mut stage, mut pb) = playback(vec![("#a", vec![kf(0, 0.0), kf(2, 10.0), kf(5, 20.0)])]);
    assert_eq!(pb.total_duration_ms(), 500.0);

    let events = pb.run_to_end(&mut stage);
    let id = TweenId(0);
    assert_eq!(
        events,
        vec![
            PlaybackEvent::StepStarted { tween: id, index: 0, at_ms: 0.0 },
            PlaybackEvent::StepStarted { tween: id, index: 1, at_ms: 0.0 },
            PlaybackEvent::StepStarted { tween: id, index: 2, at_ms: 200.0 },
            PlaybackEvent::Finished { tween: id, at_ms: 500.0 },
        ]
    );
    assert!(pb.is_finished());
    assert_eq!(stage.now(), 500.0);
}

#[test]
fn nothing_happens_after_the_last_index() {
    let (mut stage, mut pb) = playback(vec![("#a", vec![kf(0, 0.0), kf(1, 10.0)])]);
    pb.run_to_end(&mut stage);
    assert!(pb.advance_to(&mut stage, 10_000.0).is_empty());
    assert_eq!(stage.next_deadline(), None);
}

#[test]
fn partial_advance_samples_in_flight_transition() {
    let (mut stage, mut pb) = playback(vec![("#a", vec![kf(0, 0.0), kf(10, 100.0)])]);
    pb.advance_to(&mut stage, 250.0);
    let group = pb.tweens()[0].group();
    assert_eq!(stage.document().attr(group, "transform"), Some("translate(25 0)"));
    assert!(!pb.is_finished());
}

#[test]
fn tweens_play_independently() {
    let (mut stage, mut pb) = playback(vec![
        ("#a", vec![kf(1, 0.0), kf(2, 5.0)]),
        ("#b", vec![kf(0, 0.0), kf(3, 5.0)]),
    ]);
    let finished: Vec<(TweenId, f64)> = pb
        .run_to_end(&mut stage)
        .into_iter()
        .filter_map(|e| match e {
            PlaybackEvent::Finished { tween, at_ms } => Some((tween, at_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(finished, vec![(TweenId(0), 200.0), (TweenId(1), 300.0)]);
}

#[test]
fn cancel_stops_one_tween_only() {
    let (mut stage, mut pb) = playback(vec![
        ("#a", vec![kf(0, 0.0), kf(10, 100.0)]),
        ("#b", vec![kf(0, 0.0), kf(10, 100.0)]),
    ]);
    pb.advance_to(&mut stage, 500.0);
    let ev = pb.cancel(&mut stage, TweenId(0)).unwrap();
    assert_eq!(ev, PlaybackEvent::Cancelled { tween: TweenId(0), at_ms: 500.0 });
    assert!(pb.cancel(&mut stage, TweenId(0)).is_none());

    let rest = pb.run_to_end(&mut stage);
    assert!(rest.iter().all(|e| e.tween() == TweenId(1)));
    assert_eq!(pb.tween(TweenId(0)).unwrap().state(), TweenState::Cancelled);
    assert_eq!(pb.tween(TweenId(1)).unwrap().state(), TweenState::Finished);

    let a = pb.tweens()[0].group();
    assert_eq!(stage.document().attr(a, "transform"), Some("translate(50 0)"));
}
