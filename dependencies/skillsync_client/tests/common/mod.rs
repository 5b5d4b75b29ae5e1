//
// (C) Copyright IBM 2026
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

use skillsync_api::{Client, ClientBuilder};

/// Routes client logs to the test harness. Safe to call from every test.
pub fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn client(server: &mockito::Server) -> Client {
    ClientBuilder::new(server.url())
        .with_xsrf_token("test-token")
        .build()
        .unwrap()
}
