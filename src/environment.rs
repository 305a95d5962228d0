//! Environment descriptors attached to every outbound agent request

use crate::page::EngineInfo;

/// SDK name reported as part of `clientInfo`
pub const CLIENT_NAME: &str = "percy-oxide";

/// Client identity, `name/version`
pub fn client_info() -> String {
    format!("{}/{}", CLIENT_NAME, crate::VERSION)
}

/// Automation-engine identity, `engine-name; engine-version`
pub fn environment_info(engine: &EngineInfo) -> String {
    format!("{}; {}", engine.name, engine.version)
}
