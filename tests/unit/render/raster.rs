use super::*;

use crate::{
    animation::value::TransformValue,
    svg::groups::decompose,
    toolkit::SvgToolkit,
};

const FIGURE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40">
  <g id="box" transform="translate(5 5)" fill="#ff0000">
    <rect width="10" height="10"/>
    <rect x="12" y="12" width="6" height="6" fill="#0000ff"/>
  </g>
</svg>"##;

fn stage() -> (Stage, crate::svg::document::NodeId) {
    let mut stage = Stage::new(CanvasSize::new(40, 40).unwrap());
    let root = stage.document().root();
    let svg = stage.load(root, FIGURE.as_bytes()).unwrap();
    let el = stage.select(svg, "#box").unwrap().unwrap();
    (stage, el)
}

#[test]
fn draws_straight_rgba_with_optional_background() {
    let (stage, _) = stage();
    let frame = render_stage(&stage, RasterSettings::default()).unwrap();
    assert_eq!((frame.width, frame.height), (40, 40));
    assert_eq!(frame.data.len(), 40 * 40 * 4);
    assert_eq!(frame.pixel(10, 10), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(20, 20), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(39, 0), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(40, 0), None);

    let white = RasterSettings {
        clear_rgba: Some([255, 255, 255, 255]),
    };
    let frame = render_stage(&stage, white).unwrap();
    assert_eq!(frame.pixel(39, 0), Some([255, 255, 255, 255]));
}

#[test]
fn decomposition_does_not_change_pixels() {
    let (mut stage, el) = stage();
    let before = render_stage(&stage, RasterSettings::default()).unwrap();
    decompose(stage.document_mut(), el).unwrap().unwrap();
    let after = render_stage(&stage, RasterSettings::default()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn transforms_on_groups_move_pixels() {
    let (mut stage, el) = stage();
    let groups = decompose(stage.document_mut(), el).unwrap().unwrap();
    stage.set_transform(groups.translate, TransformValue::Translate { x: 20.0, y: 0.0 });
    let frame = render_stage(&stage, RasterSettings::default()).unwrap();
    assert_eq!(frame.pixel(10, 10), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(30, 10), Some([255, 0, 0, 255]));
}

#[test]
fn png_is_written() {
    let (stage, _) = stage();
    let frame = render_stage(&stage, RasterSettings::default()).unwrap();
    let dir = std::env::temp_dir().join(format!("keyplay_raster_{}", std::process::id()));
    let path = dir.join("nested").join("frame.png");
    save_png(&frame, &path).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (40, 40));
    assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
    std::fs::remove_dir_all(&dir).unwrap();
}
