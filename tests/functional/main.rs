//! Functional tests over the studio lifecycle and the HTTP API

mod api_test;
mod support;
