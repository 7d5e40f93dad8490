//! Placeholder values shared by fixtures and mock endpoints.
//!
//! None of these are real credentials.

/// Plain text password every fixture user is created with.
pub static TEST_PASSWORD: &str = "correct horse battery staple";

/// OneSignal application ID used when building a client against the mock server.
pub static TEST_ONESIGNAL_APP_ID: &str = "00000000-0000-0000-0000-000000000000";

/// OneSignal REST API key sent in the `Authorization` header of mocked requests.
pub static TEST_ONESIGNAL_API_KEY: &str = "onesignal_rest_api_key";
