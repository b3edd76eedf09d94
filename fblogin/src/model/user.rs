use serde::{Deserialize, Serialize};

/// A Facebook user as returned by the Graph API "me" endpoint.
///
/// Only `id` is guaranteed by Facebook; the remaining fields depend on the
/// granted scopes and the `fields` requested on the endpoint.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    #[must_use]
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}
