use super::*;

// =============================================================
// DotSize
// =============================================================

#[test]
fn dot_size_default_is_medium() {
    assert_eq!(DotSize::default(), DotSize::Medium);
}

#[test]
fn dot_size_pixels() {
    assert!((DotSize::Small.px() - 8.0).abs() < f64::EPSILON);
    assert!((DotSize::Medium.px() - 11.0).abs() < f64::EPSILON);
    assert!((DotSize::Large.px() - 14.0).abs() < f64::EPSILON);
}

#[test]
fn dot_size_parses_storage_values() {
    assert_eq!("small".parse::<DotSize>(), Ok(DotSize::Small));
    assert_eq!("large".parse::<DotSize>(), Ok(DotSize::Large));
    assert!("huge".parse::<DotSize>().is_err());
    assert!("Large".parse::<DotSize>().is_err());
}

#[test]
fn dot_size_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&DotSize::Large).unwrap(), "\"large\"");
    assert_eq!(DotSize::Small.to_string(), "small");
}

// =============================================================
// MapPrefs over MemoryStore
// =============================================================

#[test]
fn empty_store_yields_defaults() {
    let store = MemoryStore::new();
    let prefs = MapPrefs::load(&store);
    assert!(prefs.zoom_to_cursor);
    assert_eq!(prefs.dot_size, DotSize::Medium);
}

#[test]
fn save_writes_fixed_keys() {
    let mut store = MemoryStore::new();
    MapPrefs { zoom_to_cursor: false, dot_size: DotSize::Small }.save(&mut store);
    assert_eq!(store.get(DOT_SIZE_KEY).unwrap().as_deref(), Some("small"));
    assert_eq!(store.get(ZOOM_TO_CURSOR_KEY).unwrap().as_deref(), Some("false"));
}

#[test]
fn unrecognized_values_keep_defaults() {
    let mut store = MemoryStore::new();
    store.set(DOT_SIZE_KEY, "enormous").unwrap();
    store.set(ZOOM_TO_CURSOR_KEY, "yes").unwrap();
    assert_eq!(MapPrefs::load(&store), MapPrefs::default());
}

#[test]
fn zoom_to_cursor_false_is_read_back() {
    let mut store = MemoryStore::new();
    store.set(ZOOM_TO_CURSOR_KEY, "false").unwrap();
    assert!(!MapPrefs::load(&store).zoom_to_cursor);
}

// =============================================================
// FileStore
// =============================================================

#[test]
fn dot_size_large_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut first = FileStore::new(&path);
    let prefs = MapPrefs { dot_size: DotSize::Large, ..MapPrefs::default() };
    prefs.try_save(&mut first).unwrap();
    drop(first);

    let reloaded = FileStore::new(&path);
    assert_eq!(MapPrefs::load(&reloaded).dot_size, DotSize::Large);
}

#[test]
fn file_store_missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("absent.json"));
    assert_eq!(store.get(DOT_SIZE_KEY).unwrap(), None);
}

#[test]
fn file_store_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("prefs.json");
    let mut store = FileStore::new(&path);
    store.set("k", "v").unwrap();
    assert!(path.exists());
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn file_store_preserves_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("prefs.json"));
    store.set("other.key", "kept").unwrap();
    MapPrefs::default().try_save(&mut store).unwrap();
    assert_eq!(store.get("other.key").unwrap().as_deref(), Some("kept"));
}

#[test]
fn corrupt_file_loads_defaults_and_reports_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut store = FileStore::new(&path);
    assert_eq!(MapPrefs::load(&store), MapPrefs::default());
    assert!(matches!(MapPrefs::default().try_save(&mut store), Err(PrefsError::Json(_))));
}
