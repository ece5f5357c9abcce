//! End-to-end filter chain tests over real sources and built-in filters

use std::io::Write;
use std::sync::Arc;

use streamstack_core::filter::{
    build_filter_chain, global_filter_registry, probe_filters, FilterChainConfig, FilterRegistry,
    GzipPlugin, RecordPlugin,
};
use streamstack_core::stream::{FileStream, MemoryStream, StreamHandle};
use streamstack_core::SessionContext;

fn gzip_bytes(payload: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

fn memory_source(session: &Arc<SessionContext>, data: Vec<u8>) -> StreamHandle {
    StreamHandle::from_source(
        session,
        Some("mem://fixture".to_string()),
        Box::new(MemoryStream::new(data)),
    )
}

#[test]
fn test_auto_probe_unwraps_gzip_from_global_registry() {
    let session = Arc::new(SessionContext::new("e2e"));
    let source = memory_source(&session, gzip_bytes(b"compressed payload"));

    let mut chain = probe_filters(global_filter_registry(), source);

    // gzip bound once; record is explicit-only and must not appear
    assert_eq!(chain.depth(), 1);
    assert_eq!(chain.filter_name(), Some("gzip"));

    let mut out = Vec::new();
    chain.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"compressed payload");
}

#[test]
fn test_auto_probe_unwraps_nested_gzip() {
    let session = Arc::new(SessionContext::new("e2e"));
    let once = gzip_bytes(b"twice wrapped");
    let twice = gzip_bytes(&once);
    let source = memory_source(&session, twice);

    let mut chain = probe_filters(global_filter_registry(), source);

    assert_eq!(chain.depth(), 2);

    let mut out = Vec::new();
    chain.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"twice wrapped");
}

#[test]
fn test_config_builds_named_chain_with_record() {
    let dump_dir = tempfile::tempdir().unwrap();
    let registry = FilterRegistry::new();
    registry.register(Arc::new(GzipPlugin)).unwrap();
    registry
        .register(Arc::new(RecordPlugin::new(dump_dir.path())))
        .unwrap();

    let session = Arc::new(SessionContext::new("e2e"));
    let source = memory_source(&session, gzip_bytes(b"tee me"));

    let config = FilterChainConfig::from_list("gzip").with_record(true);
    let mut chain = config.apply(&registry, source);

    assert_eq!(chain.depth(), 2);
    assert_eq!(chain.filter_name(), Some("record"));
    assert_eq!(chain.inner().unwrap().filter_name(), Some("gzip"));

    let mut out = Vec::new();
    chain.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"tee me");
    drop(chain);

    // The record filter sits above gzip, so the dump holds decompressed bytes
    let dumps: Vec<_> = std::fs::read_dir(dump_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(dumps.len(), 1);
    assert_eq!(std::fs::read(&dumps[0]).unwrap(), b"tee me");
}

#[test]
fn test_unknown_tokens_leave_stream_usable() {
    let session = Arc::new(SessionContext::new("e2e"));
    let source = memory_source(&session, b"plain".to_vec());

    let mut chain = build_filter_chain(
        global_filter_registry(),
        source,
        Some("nosuchfilter:alsonothere"),
        false,
    );

    assert_eq!(chain.depth(), 0);
    let mut out = Vec::new();
    chain.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"plain");
}

#[test]
fn test_gzip_file_source_keeps_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payload.gz");
    std::fs::write(&path, gzip_bytes(b"from disk")).unwrap();

    let session = Arc::new(SessionContext::new("e2e"));
    let file = FileStream::open(&path).unwrap();
    let url = file.url();
    let source = StreamHandle::from_source(&session, Some(url.clone()), Box::new(file));

    let mut chain = probe_filters(global_filter_registry(), source);

    assert_eq!(chain.depth(), 1);
    assert_eq!(chain.url(), Some(url.as_str()));

    let mut out = Vec::new();
    chain.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"from disk");
}

#[test]
fn test_directory_listing_delegates_through_filter() {
    let listed_dir = tempfile::tempdir().unwrap();
    std::fs::write(listed_dir.path().join("track2.ogg"), b"x").unwrap();
    std::fs::write(listed_dir.path().join("track1.ogg"), b"x").unwrap();

    let dump_dir = tempfile::tempdir().unwrap();
    let registry = FilterRegistry::new();
    registry
        .register(Arc::new(RecordPlugin::new(dump_dir.path())))
        .unwrap();

    let session = Arc::new(SessionContext::new("e2e"));
    let dir_stream = FileStream::open(listed_dir.path()).unwrap();
    let source = StreamHandle::from_source(&session, None, Box::new(dir_stream));

    // The record filter has no listing of its own and delegates inward
    let mut chain = build_filter_chain(&registry, source, None, true);
    assert_eq!(chain.depth(), 1);

    let entries = chain.read_dir().unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["track1.ogg", "track2.ogg"]);
}
