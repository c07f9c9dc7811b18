/*
 * Responsibility
 * - User (identity + grants) と Permissions (service => capabilities) の定義
 * - 認可判定 `User::is_authorized` (pure function, no I/O)
 *
 * Notes
 * - "all" は wildcard grant。capability 判定では全 service に union されるが、
 *   service の存在チェックは満たさない (service="" の場合のみ通る)
 */
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Service key whose capabilities apply to every service.
pub const WILDCARD_SERVICE: &str = "all";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("user is not authorized to use service {service}")]
    ServiceNotAuthorized { service: String },

    #[error("user is not authorized to use capabilities {}", MissingList(.missing))]
    CapabilitiesNotAuthorized { missing: Vec<String> },
}

// Renders as `[c2 c3]`.
struct MissingList<'a>(&'a [String]);

impl fmt::Display for MissingList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}

/// service name => capability names granted for that service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(HashMap<String, Vec<String>>);

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `capabilities` to `service`, creating the entry if needed.
    pub fn grant<I, S>(mut self, service: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(service.into())
            .or_default()
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    pub fn get(&self, service: &str) -> Option<&[String]> {
        self.0.get(service).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for Permissions {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Permissions
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (service, caps)| acc.grant(service, caps))
    }
}

/// Authenticated identity carried inside an access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    // Tokens minted by older issuers encode an empty grant map as `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Permissions,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    /// Check that the user may use `service` with every capability in `capabilities`.
    ///
    /// - empty `service` skips the service-existence check
    /// - service lookup is case-insensitive (the requested name is lower-cased)
    /// - capabilities granted under `"all"` count for any service
    /// - on failure, missing capabilities are reported in request order
    pub fn is_authorized<S: AsRef<str>>(
        &self,
        service: &str,
        capabilities: &[S],
    ) -> Result<(), AuthzError> {
        let service_caps = self.permissions.get(&service.to_lowercase());

        if !service.is_empty() && service_caps.is_none() {
            return Err(AuthzError::ServiceNotAuthorized {
                service: service.to_string(),
            });
        }

        if capabilities.is_empty() {
            return Ok(());
        }

        let wildcard_caps = self.permissions.get(WILDCARD_SERVICE).unwrap_or_default();

        let granted: HashSet<&str> = service_caps
            .unwrap_or_default()
            .iter()
            .chain(wildcard_caps)
            .map(String::as_str)
            .collect();

        let missing: Vec<String> = capabilities
            .iter()
            .map(|cap| cap.as_ref())
            .filter(|cap| !granted.contains(cap))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthzError::CapabilitiesNotAuthorized { missing })
        }
    }
}
