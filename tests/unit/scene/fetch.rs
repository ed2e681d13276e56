use super::*;

use std::collections::HashMap;

use crate::scene::config::PlayerOptions;

struct MemFetch(HashMap<&'static str, &'static str>);

impl Fetch for MemFetch {
    fn fetch(&self, location: &str) -> KeyplayResult<Vec<u8>> {
        self.0
            .get(location)
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| KeyplayError::fetch_failed(location, "not found"))
    }
}

fn mem() -> MemFetch {
    MemFetch(HashMap::from([
        ("ok.json", r#"{"steps": 3}"#),
        ("broken.json", r#"{"steps": 3"#),
        ("shape.json", r#"{"steps": [1]}"#),
    ]))
}

#[test]
fn json_errors_are_classified() {
    let f = mem();
    let opts: PlayerOptions = fetch_json(&f, "ok.json").unwrap();
    assert_eq!(opts.steps, Some(3));

    let err = fetch_json::<PlayerOptions>(&f, "broken.json").unwrap_err();
    assert!(matches!(err, KeyplayError::FetchFailed { .. }));

    let err = fetch_json::<PlayerOptions>(&f, "shape.json").unwrap_err();
    assert!(matches!(err, KeyplayError::Serde(_)));

    let err = fetch_json::<PlayerOptions>(&f, "missing.json").unwrap_err();
    assert!(matches!(err, KeyplayError::FetchFailed { location, .. } if location == "missing.json"));
}

#[test]
fn fs_fetch_resolves_relative_to_root() {
    let dir = std::env::temp_dir().join(format!("keyplay_fetch_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("scene.svg"), b"<svg/>").unwrap();

    let f = FsFetch::new(&dir);
    assert_eq!(f.fetch("scene.svg").unwrap(), b"<svg/>");
    let abs = dir.join("scene.svg");
    assert_eq!(f.fetch(abs.to_str().unwrap()).unwrap(), b"<svg/>");
    assert!(matches!(
        f.fetch("nope.svg"),
        Err(KeyplayError::FetchFailed { .. })
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn recognizes_http_urls() {
    assert!(is_http_url("https://example.com/a.json"));
    assert!(is_http_url("http://localhost/a.json"));
    assert!(!is_http_url("data/a.json"));
    assert_eq!(
        FsFetch::new("/srv").resolve("file:///tmp/a.svg"),
        PathBuf::from("/tmp/a.svg")
    );
}
