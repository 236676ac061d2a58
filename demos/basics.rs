//! Basics Example
//!
//! Demonstrates the memory and disk backends behind the same contract:
//! set/get, TTL expiry, `get_or_set`, overwrite, delete and stats.
//!
//! Run with: cargo run --example basics
//! (set `RUST_LOG=swap_cache=debug` to see backend log lines)

use std::cell::Cell;
use std::path::Path;
use std::time::Duration;
use swap_cache::{make_key, CacheBackend, CacheBackendExt, DiskCache, MemoryCache};
use tracing_subscriber::EnvFilter;

const DISK_PATH: &str = "/tmp/swap_cache_demo.db";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    memory_demo()?;
    disk_demo()?;

    println!("\nAll examples ran successfully.");
    Ok(())
}

fn memory_demo() -> anyhow::Result<()> {
    println!("=== MemoryCache ===");
    let mut mem = MemoryCache::new();

    mem.set("greeting", &"hello, world".into(), None)?;
    println!("get: {:?}", mem.get("greeting")?);
    println!("exists: {}", mem.exists("greeting")?);
    println!("miss: {:?}", mem.get("not_there")?);

    // TTL: value disappears after 1 second
    mem.set("ephemeral", &"blink".into(), Some(Duration::from_secs(1)))?;
    println!("before TTL: {:?}", mem.get("ephemeral")?);
    std::thread::sleep(Duration::from_millis(1100));
    println!("after TTL: {:?}", mem.get("ephemeral")?);

    // get_or_set: cache expensive computation
    let call_count = Cell::new(0);
    let expensive = || {
        call_count.set(call_count.get() + 1);
        Ok::<_, anyhow::Error>((0..1_000_000_u64).sum::<u64>().into())
    };

    let key = make_key(&["results", "sum_1M"]);
    let r1 = mem.get_or_set(&key, expensive, None)?;
    let _r2 = mem.get_or_set(&key, expensive, None)?; // fn not called again
    println!("result: {r1}, fn called {} time(s)", call_count.get());

    println!("stats: {}", mem.stats()?);
    mem.close()?;
    Ok(())
}

fn disk_demo() -> anyhow::Result<()> {
    println!("\n=== DiskCache ===");

    // Clean demo run
    if Path::new(DISK_PATH).exists() {
        std::fs::remove_file(DISK_PATH)?;
    }

    let mut disk = DiskCache::open(DISK_PATH)?;
    disk.set("user:42", &serde_json::json!({"name": "Alice", "score": 99}), None)?;
    println!("user: {:?}", disk.get("user:42")?);

    // Overwrite
    disk.set("user:42", &serde_json::json!({"name": "Alice", "score": 100}), None)?;
    if let Some(user) = disk.get("user:42")? {
        println!("updated score: {}", user["score"]);
    }

    // Delete
    println!("deleted: {}", disk.delete("user:42")?);
    println!("after delete: {:?}", disk.get("user:42")?);

    println!("stats: {}", disk.stats()?);
    disk.close()?;
    Ok(())
}
