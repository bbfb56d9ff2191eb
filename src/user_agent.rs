//! Shared User-Agent string for provider HTTP clients.
//!
//! CrossRef and OpenAlex route clients that identify themselves with a contact
//! address to their "polite pool", so the address is part of the UA when set.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/harvester";

/// Builds the User-Agent used for every provider request.
///
/// Blank or whitespace-only `mailto` values are ignored.
#[must_use]
pub(crate) fn harvester_user_agent(mailto: Option<&str>) -> String {
    let version = env!("CARGO_PKG_VERSION");
    match mailto.map(str::trim).filter(|mailto| !mailto.is_empty()) {
        Some(mailto) => {
            format!("harvester/{version} (bibliographic-harvester; +{PROJECT_UA_URL}; mailto:{mailto})")
        }
        None => format!("harvester/{version} (bibliographic-harvester; +{PROJECT_UA_URL})"),
    }
}
