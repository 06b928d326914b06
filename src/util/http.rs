use const_format::concatcp;
use lazy_static::lazy_static;
use reqwest::Client;
use std::time::Duration;

pub const USER_AGENT: &str = concatcp!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION")
);

lazy_static! {
    pub static ref CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(15))
        .build()
        .unwrap_or_default();
}
