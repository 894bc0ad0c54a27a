//! End-to-end façade scenarios, run against both graph stores.

use std::sync::Arc;

use graphfs::{
    Connector, Encoding, Entry, Filesystem, FsError, GraphConnector, GraphStore, MemoryStore,
    NodeRecord, SqliteStore, seed_default_tree,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn memory_fs() -> Filesystem<GraphConnector<MemoryStore>> {
    init_tracing();
    let store = MemoryStore::new();
    let root = store.create_root(NodeRecord::root()).await.unwrap();
    Filesystem::new(GraphConnector::new(store, root))
}

fn sqlite_fs() -> Filesystem<GraphConnector<SqliteStore>> {
    init_tracing();
    let store = SqliteStore::in_memory().unwrap();
    let root = store.create_tree("test1").unwrap();
    Filesystem::new(GraphConnector::new(store, root))
}

async fn roundtrip<C: Connector>(fs: &Filesystem<C>) {
    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("/empty", Vec::new()),
        ("/ascii", b"plain old text".to_vec()),
        ("/multibyte", "dérp — 日本語 🗂".as_bytes().to_vec()),
        ("/binary", vec![0u8, 255, 1, 254, 127, 128, 0]),
    ];
    for (path, content) in cases {
        fs.write(path, content.clone()).await.unwrap();
        assert_eq!(fs.read(path).await.unwrap(), content, "at {path}");
    }
}

#[tokio::test]
async fn roundtrip_memory() {
    roundtrip(&memory_fs().await).await;
}

#[tokio::test]
async fn roundtrip_sqlite() {
    roundtrip(&sqlite_fs()).await;
}

async fn append_concatenates<C: Connector>(fs: &Filesystem<C>) {
    // append on a fresh path behaves exactly as write
    fs.append("/derp.txt", "derp").await.unwrap();
    assert_eq!(fs.read_to_string("/derp.txt").await.unwrap(), "derp");

    fs.append("/derp.txt", "derp").await.unwrap();
    assert_eq!(fs.read_to_string("/derp.txt").await.unwrap(), "derpderp");
}

#[tokio::test]
async fn append_memory() {
    append_concatenates(&memory_fs().await).await;
}

#[tokio::test]
async fn append_sqlite() {
    append_concatenates(&sqlite_fs()).await;
}

async fn mkdir_semantics<C: Connector>(fs: &Filesystem<C>) {
    fs.mkdir("/projects").await.unwrap();
    assert!(fs.exists("/projects").await.unwrap());
    let stat = fs.stat("/projects").await.unwrap();
    assert!(stat.is_directory);
    assert!(!stat.is_file);

    let err = fs.mkdir("/projects").await.unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(_)));
}

#[tokio::test]
async fn mkdir_memory() {
    mkdir_semantics(&memory_fs().await).await;
}

#[tokio::test]
async fn mkdir_sqlite() {
    mkdir_semantics(&sqlite_fs()).await;
}

async fn missing_paths<C: Connector>(fs: &Filesystem<C>) {
    let err = fs.stat("/nowhere").await.unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    assert!(!fs.exists("/nowhere").await.unwrap());
    assert!(!fs.exists("/no/such/depth").await.unwrap());
}

#[tokio::test]
async fn missing_memory() {
    missing_paths(&memory_fs().await).await;
}

#[tokio::test]
async fn missing_sqlite() {
    missing_paths(&sqlite_fs()).await;
}

async fn listing_is_exact<C: Connector>(fs: &Filesystem<C>) {
    fs.mkdir("/d").await.unwrap();
    fs.write("/d/one.txt", "1").await.unwrap();
    fs.write("/d/two.txt", "2").await.unwrap();
    fs.mkdir("/d/sub").await.unwrap();

    let mut names = fs.list_directory("/d").await.unwrap();
    names.sort();
    assert_eq!(names, vec!["one.txt", "sub", "two.txt"]);
}

#[tokio::test]
async fn listing_memory() {
    listing_is_exact(&memory_fs().await).await;
}

#[tokio::test]
async fn listing_sqlite() {
    listing_is_exact(&sqlite_fs()).await;
}

async fn write_needs_parent<C: Connector>(fs: &Filesystem<C>) {
    let err = fs.write("/missing/dir/file.txt", "data").await.unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    // no partial entry was created anywhere along the path
    assert!(!fs.exists("/missing/dir/file.txt").await.unwrap());
    assert!(!fs.exists("/missing/dir").await.unwrap());
    assert!(!fs.exists("/missing").await.unwrap());
}

#[tokio::test]
async fn write_needs_parent_memory() {
    write_needs_parent(&memory_fs().await).await;
}

#[tokio::test]
async fn write_needs_parent_sqlite() {
    write_needs_parent(&sqlite_fs()).await;
}

async fn home_scenario<C: Connector>(fs: &Filesystem<C>) {
    seed_default_tree(fs, "test1").await.unwrap();
    assert!(fs.stat("/home/test1").await.unwrap().is_directory);

    assert!(!fs.exists("/home/test1/derp.txt").await.unwrap());
    fs.write("/home/test1/derp.txt", "derp").await.unwrap();
    assert_eq!(
        fs.read_to_string("/home/test1/derp.txt").await.unwrap(),
        "derp"
    );

    fs.append("/home/test1/derp.txt", "derp").await.unwrap();
    assert_eq!(
        fs.read_to_string("/home/test1/derp.txt").await.unwrap(),
        "derpderp"
    );
}

#[tokio::test]
async fn home_scenario_memory() {
    home_scenario(&memory_fs().await).await;
}

#[tokio::test]
async fn home_scenario_sqlite() {
    home_scenario(&sqlite_fs()).await;
}

async fn rmdir_semantics<C: Connector>(fs: &Filesystem<C>) {
    fs.mkdir("/d").await.unwrap();
    fs.write("/d/file.txt", "x").await.unwrap();

    let err = fs.rmdir("/d").await.unwrap_err();
    assert!(matches!(err, FsError::NotEmpty(_)));

    fs.rm("/d/file.txt").await.unwrap();
    fs.rmdir("/d").await.unwrap();
    assert!(!fs.exists("/d").await.unwrap());
}

#[tokio::test]
async fn rmdir_memory() {
    rmdir_semantics(&memory_fs().await).await;
}

#[tokio::test]
async fn rmdir_sqlite() {
    rmdir_semantics(&sqlite_fs()).await;
}

async fn mkdirp_semantics<C: Connector>(fs: &Filesystem<C>) {
    fs.mkdirp("/a/b/c").await.unwrap();
    assert!(fs.stat("/a").await.unwrap().is_directory);
    assert!(fs.stat("/a/b").await.unwrap().is_directory);
    assert!(fs.stat("/a/b/c").await.unwrap().is_directory);

    // idempotent, existing ancestors skipped
    fs.mkdirp("/a/b/c").await.unwrap();
    fs.mkdirp("/a/b/c/d").await.unwrap();
    assert!(fs.exists("/a/b/c/d").await.unwrap());
}

#[tokio::test]
async fn mkdirp_memory() {
    mkdirp_semantics(&memory_fs().await).await;
}

#[tokio::test]
async fn mkdirp_sqlite() {
    mkdirp_semantics(&sqlite_fs()).await;
}

async fn update_preserves_metadata<C: Connector>(fs: &Filesystem<C>) {
    fs.write("/f", "first").await.unwrap();
    let before = match fs.connector().retrieve("/f").await.unwrap() {
        Entry::File { meta, .. } => meta,
        _ => unreachable!(),
    };

    fs.write("/f", vec![1u8, 2, 3]).await.unwrap();
    match fs.connector().retrieve("/f").await.unwrap() {
        Entry::File {
            meta,
            contents,
            encoding,
        } => {
            assert_eq!(contents, vec![1, 2, 3]);
            assert_eq!(encoding, Encoding::Binary);
            assert_eq!(meta.created_at, before.created_at);
            assert_eq!(meta.permissions, before.permissions);
            assert!(meta.last_modified >= before.last_modified);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn update_metadata_memory() {
    update_preserves_metadata(&memory_fs().await).await;
}

#[tokio::test]
async fn update_metadata_sqlite() {
    update_preserves_metadata(&sqlite_fs()).await;
}

#[tokio::test]
async fn tenants_do_not_share_state() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let alice = Filesystem::new(GraphConnector::new(
        Arc::clone(&store),
        store.create_tree("alice").unwrap(),
    ));
    let bob = Filesystem::new(GraphConnector::new(
        Arc::clone(&store),
        store.create_tree("bob").unwrap(),
    ));

    seed_default_tree(&alice, "alice").await.unwrap();
    seed_default_tree(&bob, "bob").await.unwrap();
    alice.write("/home/alice/secret", "mine").await.unwrap();

    assert!(!bob.exists("/home/alice").await.unwrap());
    let mut homes = bob.list_directory("/home").await.unwrap();
    homes.sort();
    assert_eq!(homes, vec!["bob"]);
}

#[tokio::test]
async fn traversal_cap_surfaces_distinctly() {
    let store = Arc::new(MemoryStore::new());
    let root = store.create_root(NodeRecord::root()).await.unwrap();

    let wide = Filesystem::new(GraphConnector::new(Arc::clone(&store), root));
    wide.mkdir("/d").await.unwrap();
    for i in 0..5 {
        wide.write(&format!("/d/f{i}"), "x").await.unwrap();
    }

    let capped = Filesystem::new(GraphConnector::new(store, root).with_scan_limit(3));
    let err = capped.exists("/d/nope").await.unwrap_err();
    assert!(
        matches!(err, FsError::TraversalLimitExceeded(_)),
        "truncated scan must not look like absence, got: {err}"
    );
}
