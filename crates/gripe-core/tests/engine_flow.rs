/// Integration test: the full account/session/library lifecycle against
/// an on-disk database, including the restart paths a UI shell relies
/// on (session restore, returning-user photo lists).
use gripe_core::{DirectoryError, Engine, EngineError};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn register_duplicate_photo_logout_login_scenario() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gripe.db");

    let mut engine = Engine::open(&path).unwrap();
    assert!(!engine.session().is_authenticated());

    // Registration signs the new account in.
    let alice_id = engine.register("alice", "a@x.com", "pw1").unwrap().id;
    assert!(engine.session().is_authenticated());

    // Second registration reusing the username is rejected and leaves
    // the current session alone.
    match engine.register("alice", "b@x.com", "pw2") {
        Err(DirectoryError::UsernameTaken) => {}
        other => panic!("expected UsernameTaken, got {other:?}"),
    }
    assert_eq!(engine.session().account().unwrap().id, alice_id);

    let mut library = engine.library().unwrap();
    library
        .add_photo("p1.jpg", "data:image/jpeg;base64,AAAA")
        .unwrap();
    assert_eq!(library.photos().len(), 1);
    drop(library);

    // Logout clears the in-memory session and removes the stored row.
    assert!(engine.logout().unwrap());
    assert!(!engine.session().is_authenticated());
    match engine.library() {
        Err(EngineError::NotAuthenticated) => {}
        other => panic!("expected NotAuthenticated, got {:?}", other.err()),
    }
    assert!(engine.db().load_session().unwrap().is_none());

    // Logging back in finds the same owner id and the photo intact.
    let login_id = engine.login("alice", "pw1").unwrap().id;
    assert_eq!(login_id, alice_id);

    let library = engine.library().unwrap();
    assert_eq!(library.photos().len(), 1);
    assert_eq!(library.photos()[0].filename, "p1.jpg");
}

#[test]
fn fresh_user_sees_empty_list_returning_user_sees_full_list() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gripe.db");

    let mut engine = Engine::open(&path).unwrap();
    engine.register("alice", "a@x.com", "pw1").unwrap();

    let mut library = engine.library().unwrap();
    library
        .add_photo("one.jpg", "data:image/jpeg;base64,AAAA")
        .unwrap();
    library
        .add_photo("two.jpg", "data:image/jpeg;base64,BBBB")
        .unwrap();
    drop(library);
    engine.logout().unwrap();

    // A brand-new account starts from nothing.
    engine.register("carol", "c@x.com", "pw3").unwrap();
    assert!(engine.library().unwrap().photos().is_empty());
    engine.logout().unwrap();

    // The returning account gets its full, unchanged list.
    engine.login("alice", "pw1").unwrap();
    let photos: Vec<String> = engine
        .library()
        .unwrap()
        .photos()
        .iter()
        .map(|p| p.filename.clone())
        .collect();
    assert_eq!(photos, ["one.jpg", "two.jpg"]);
}

#[test]
fn session_survives_an_engine_restart() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gripe.db");

    {
        let mut engine = Engine::open(&path).unwrap();
        engine.register("bob", "b@x.com", "pw").unwrap();
    }

    {
        let mut engine = Engine::open(&path).unwrap();
        assert_eq!(engine.session().account().unwrap().username, "bob");
        engine.logout().unwrap();
    }

    let engine = Engine::open(&path).unwrap();
    assert!(!engine.session().is_authenticated());
}
