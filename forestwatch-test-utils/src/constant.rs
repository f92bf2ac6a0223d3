pub static TEST_USERNAME: &str = "ranger@example.com";
pub static TEST_PASSWORD: &str = "test_password";
pub static TEST_ORGANIZATION: &str = "EarthRanger";

pub static TEST_ACCESS_TOKEN: &str = "test_access_token";
pub static TEST_API_KEY: &str = "test_api_key";
pub static TEST_API_KEY_USER_ID: &str = "test_user_id";

pub static TEST_AOI_ID: &str = "6dd3a9c5b1f0a3001b1c7a29";
pub static TEST_AOI_GEOSTORE_ID: &str = "9f1b2c3d4e5f60718293a4b5c6d7e8f9";
pub static TEST_GEOSTORE_ID: &str = "3f5b2c1a0d4e4b8a9c7f1e2d3c4b5a69";
/// Standard UUID form of [`TEST_GEOSTORE_ID`].
pub static TEST_GEOSTORE_UUID: &str = "3F5B2C1A-0D4E-4B8A-9C7F-1E2D3C4B5A69";

pub static INTEGRATED_ALERTS_DATASET: &str = "gfw_integrated_alerts";
pub static FIRE_ALERTS_DATASET: &str = "nasa_viirs_fire_alerts";
