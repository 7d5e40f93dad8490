mod dispatch;

use chamados_test_utils::prelude::*;
use entity::sea_orm_active_enums::Hierarchy;

use super::*;
use crate::server::{
    config::OneSignalConfig,
    service::notification::onesignal::{OneSignalChannel, OneSignalClient, OneSignalService},
};

fn onesignal_client(test: &TestContext) -> OneSignalClient {
    OneSignalClient::new(
        reqwest::Client::new(),
        &OneSignalConfig {
            app_id: TEST_ONESIGNAL_APP_ID.to_string(),
            rest_api_key: TEST_ONESIGNAL_API_KEY.to_string(),
            api_url: test.server_url(),
        },
        "http://localhost:8000",
    )
}
