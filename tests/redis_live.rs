//! Tests against a running Redis server
//!
//! Ignored by default. Run with `cargo test -- --ignored` with Redis on
//! localhost:6379; database 2 is flushed before and after.

use redis::Commands;
use sentinel_redis_token_auth::acl::AccessMode;
use sentinel_redis_token_auth::store::{KeyValueStore, RedisStore};
use sentinel_redis_token_auth::{RedisTokenBackend, RedisTokenConfig};
use std::sync::atomic::AtomicBool;

const ID: &str = "id:q3n4j4q59w4857w0498y4rq4wyr";
const TOKEN: &str = "23h49583hy43098r2h4098h3p2huqrp89ry4pwr8owhap840y98qryw4098ay09";

fn config() -> RedisTokenConfig {
    RedisTokenConfig {
        db: 2,
        startup_timeout_secs: Some(5),
        retry_interval_ms: 200,
        ..Default::default()
    }
}

fn admin() -> redis::Connection {
    let config = config();
    let url = format!("redis://{}/{}", config.address(), config.db);
    let mut conn = redis::Client::open(url.as_str()).unwrap().get_connection().unwrap();
    redis::cmd("FLUSHDB").query::<()>(&mut conn).unwrap();
    conn
}

#[test]
#[ignore]
fn test_live_backend() {
    let mut conn = admin();
    let _: () = conn.set(ID, TOKEN).unwrap();
    let _: () = conn.set(format!("{}:su", ID), "true").unwrap();
    let _: () = conn.sadd(format!("{}:racls", ID), format!("{}/topic/1", ID)).unwrap();
    let _: () = conn.sadd(format!("{}:wacls", ID), "write/test").unwrap();
    let _: () = conn.sadd("common:racls", format!("{}/%c", ID)).unwrap();

    let cancel = AtomicBool::new(false);
    let backend = RedisTokenBackend::connect(&config(), Some(&cancel)).unwrap();

    assert!(backend.authenticate(ID, TOKEN, ""));
    assert!(!backend.authenticate(ID, "wrong_password", ""));
    assert!(backend.is_superuser(ID));

    assert!(backend.check_acl(ID, &format!("{}/topic/1", ID), "c1", AccessMode::Read));
    assert!(!backend.check_acl(ID, &format!("{}/topic/2", ID), "c1", AccessMode::Read));
    assert!(backend.check_acl(ID, &format!("{}/c1", ID), "c1", AccessMode::Read));
    assert!(!backend.check_acl(ID, "write/test", "c1", AccessMode::Read));
    assert!(backend.check_acl(ID, "write/test", "c1", AccessMode::Write));

    backend.halt();
    assert!(!backend.authenticate(ID, TOKEN, ""));

    let _: () = redis::cmd("FLUSHDB").query(&mut conn).unwrap();
}

#[test]
#[ignore]
fn test_live_wrong_type_is_denied() {
    let mut conn = admin();
    let _: () = conn.sadd(ID, "not-a-token").unwrap();

    let store = RedisStore::connect(&config(), None).unwrap();
    assert!(store.get_string(ID).is_err());
    assert!(store.get_set_members("missing:racls").unwrap().is_empty());

    store.close().unwrap();
    store.close().unwrap();

    let _: () = redis::cmd("FLUSHDB").query(&mut conn).unwrap();
}
