//! Integration tests for syncthing-shell
//!
//! The REST client and the service monitor run against a wiremock Syncthing
//! daemon; the shell runs against an in-memory API and a recording host on a
//! paused tokio clock.

mod common;

mod test_client;
mod test_monitor;
