use mockito::{Mock, Server, ServerGuard};

/// Mock upstream server plus the mocks registered against it.
///
/// The Data API and Resource Watch API are both served from [`TestSetup::url`], matching
/// how the client is configured with a single base URL in tests.
pub struct TestSetup {
    pub server: ServerGuard,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Self {
        let server = Server::new_async().await;

        TestSetup {
            server,
            mocks: Vec::new(),
        }
    }

    /// Base URL of the mock server.
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Keep `mock` so [`assert_mocks`](Self::assert_mocks) verifies it.
    pub fn track(&mut self, mock: Mock) {
        self.mocks.push(mock);
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// Calls `assert()` on all tracked mocks to verify they were invoked the expected number
    /// of times.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
