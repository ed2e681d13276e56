use super::*;

const FIGURE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <g id="arm"><rect x="10" y="20" width="30" height="40"/></g>
  <g id="leg"/>
</svg>"##;

fn loaded() -> (Stage, NodeId) {
    let mut stage = Stage::new(CanvasSize::default());
    let root = stage.document().root();
    let svg = stage.load(root, FIGURE.as_bytes()).unwrap();
    (stage, svg)
}

fn rotate(angle: f64) -> TransformValue {
    TransformValue::Rotate {
        angle,
        cx: 0.0,
        cy: 0.0,
    }
}

#[test]
fn load_appends_under_container_and_select_scopes() {
    let (stage, svg) = loaded();
    let doc = stage.document();
    assert_eq!(doc.parent(svg), Some(doc.root()));
    let arm = stage.select(svg, "#arm").unwrap().unwrap();
    assert_eq!(doc.attr(arm, "id"), Some("arm"));
    assert!(stage.select(svg, "#missing").unwrap().is_none());
    assert!(stage.select(svg, "g:hover").is_err());
    assert!(stage.select(svg, "g::before").is_err());
    let leg = stage.select(svg, "[id=leg]").unwrap().unwrap();
    assert_eq!(doc.attr(leg, "id"), Some("leg"));
}

#[test]
fn bbox_is_in_local_space() {
    let (stage, svg) = loaded();
    let arm = stage.select(svg, "#arm").unwrap().unwrap();
    let bbox = stage.bbox(arm).unwrap();
    assert!((bbox.x0 - 10.0).abs() < 1e-3);
    assert!((bbox.y1 - 60.0).abs() < 1e-3);
}

#[test]
fn transition_samples_then_lands_exactly() {
    let (mut stage, svg) = loaded();
    let arm = stage.select(svg, "#arm").unwrap().unwrap();
    stage.animate(arm, rotate(90.0), 1000.0, Ease::Linear, TweenId(0));
    assert_eq!(stage.next_deadline(), Some(1000.0));

    assert!(stage.advance_to(500.0).is_empty());
    assert_eq!(stage.transform(arm), Some(rotate(45.0)));
    assert_eq!(stage.document().attr(arm, "transform"), Some("rotate(45 0 0)"));

    let done = stage.advance_to(1500.0);
    assert_eq!(
        done,
        vec![Completion {
            token: TweenId(0),
            at_ms: 1000.0
        }]
    );
    assert_eq!(stage.transform(arm), Some(rotate(90.0)));
    assert_eq!(stage.now(), 1500.0);
    assert_eq!(stage.running_transitions(), 0);
}

#[test]
fn events_fire_earliest_first_with_schedule_order_for_ties() {
    let (mut stage, svg) = loaded();
    let leg = stage.select(svg, "#leg").unwrap().unwrap();
    stage.delay(300.0, TweenId(2));
    stage.delay(100.0, TweenId(1));
    stage.animate(leg, rotate(10.0), 100.0, Ease::Linear, TweenId(3));

    let fired: Vec<(usize, f64)> = stage
        .advance_to(1000.0)
        .iter()
        .map(|c| (c.token.0, c.at_ms))
        .collect();
    assert_eq!(fired, vec![(1, 100.0), (3, 100.0), (2, 300.0)]);
    assert_eq!(stage.pending_timers(), 0);
}

#[test]
fn stop_cancels_without_completing() {
    let (mut stage, svg) = loaded();
    let arm = stage.select(svg, "#arm").unwrap().unwrap();
    stage.animate(arm, rotate(90.0), 1000.0, Ease::Linear, TweenId(4));
    stage.advance_to(250.0);
    assert!(stage.is_animating(arm));

    stage.stop(arm);
    assert_eq!(stage.take_cancelled(), vec![TweenId(4)]);
    assert!(stage.take_cancelled().is_empty());
    assert!(stage.advance_to(2000.0).is_empty());
    assert_eq!(stage.transform(arm), Some(rotate(22.5)));
}

#[test]
fn cancel_token_drops_timers_and_transitions_of_that_token_only() {
    let (mut stage, svg) = loaded();
    let arm = stage.select(svg, "#arm").unwrap().unwrap();
    stage.delay(300.0, TweenId(2));
    stage.delay(400.0, TweenId(5));
    stage.animate(arm, rotate(90.0), 1000.0, Ease::Linear, TweenId(2));

    stage.cancel_token(TweenId(2));
    assert_eq!(stage.pending_timers(), 1);
    assert_eq!(stage.running_transitions(), 0);
    assert_eq!(stage.take_cancelled(), vec![TweenId(2)]);

    stage.cancel_token(TweenId(7));
    assert!(stage.take_cancelled().is_empty());

    let fired = stage.advance_to(1000.0);
    assert_eq!(fired, vec![Completion { token: TweenId(5), at_ms: 400.0 }]);
}

#[test]
fn new_animation_replaces_running_one_from_current_pose() {
    let (mut stage, svg) = loaded();
    let arm = stage.select(svg, "#arm").unwrap().unwrap();
    stage.animate(arm, rotate(100.0), 1000.0, Ease::Linear, TweenId(0));
    stage.advance_to(500.0);
    stage.animate(arm, rotate(0.0), 500.0, Ease::Linear, TweenId(1));
    assert_eq!(stage.take_cancelled(), vec![TweenId(0)]);

    stage.advance_to(750.0);
    assert_eq!(stage.transform(arm), Some(rotate(25.0)));
}

#[test]
fn clock_never_moves_backwards() {
    let (mut stage, _) = loaded();
    stage.advance_to(400.0);
    stage.advance_to(100.0);
    assert_eq!(stage.now(), 400.0);
    stage.delay(0.0, TweenId(9));
    assert_eq!(stage.next_deadline(), Some(400.0));
    assert_eq!(stage.advance_to(400.0).len(), 1);
}

#[test]
fn existing_host_document_becomes_canvas() {
    let doc = SvgDocument::parse(FIGURE).unwrap();
    let stage = Stage::from_document(doc).unwrap();
    assert_eq!(stage.size(), CanvasSize::new(100, 100).unwrap());

    let bare = SvgDocument::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
    assert!(Stage::from_document(bare).is_err());
}
