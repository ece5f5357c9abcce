//! Auto-probe demo: layer the gzip filter over an in-memory source.
//!
//! Run with `RUST_LOG=debug` to watch the probe loop extend the chain.

use std::io::Write;
use std::sync::Arc;

use streamstack_core::filter::{global_filter_registry, probe_filters};
use streamstack_core::stream::{MemoryStream, StreamHandle};
use streamstack_core::SessionContext;

fn main() -> streamstack_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(b"hello from beneath the filter chain\n")
        .unwrap();
    let compressed = encoder.finish().unwrap();

    let session = Arc::new(SessionContext::new("demo"));
    let source = StreamHandle::from_source(
        &session,
        Some("mem://demo".to_string()),
        Box::new(MemoryStream::new(compressed)),
    );

    let mut chain = probe_filters(global_filter_registry(), source);
    println!("chain depth: {}", chain.depth());
    if let Some(name) = chain.filter_name() {
        println!("outermost filter: {name}");
    }

    let mut out = Vec::new();
    chain.read_to_end(&mut out)?;
    print!("{}", String::from_utf8_lossy(&out));
    Ok(())
}
