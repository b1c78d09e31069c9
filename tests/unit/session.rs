use super::*;

#[test]
fn memory_session_round_trips_keys() {
    let mut s = MemorySession::new();
    assert!(s.is_empty());
    assert!(!s.contains(PRELOADER_SEEN));
    s.set(PRELOADER_SEEN, "true");
    assert_eq!(s.get(PRELOADER_SEEN).as_deref(), Some("true"));
    assert!(s.contains(PRELOADER_SEEN));
    assert_eq!(s.len(), 1);
}

#[test]
fn loads_from_a_flat_json_object() {
    let s: MemorySession = serde_json::from_str(r#"{"preloaderSeen":"true"}"#).unwrap();
    assert_eq!(s, MemorySession::new().with(PRELOADER_SEEN, "true"));
}
