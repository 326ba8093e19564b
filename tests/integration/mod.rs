//! Integration tests driving the acb binary against fake build tools
#![cfg(unix)]

mod helpers;
mod test_init;
mod test_run;
mod test_status;
