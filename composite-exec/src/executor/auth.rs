/// The inbound caller's Authorization header, split on the first space and
/// re-attached unchanged to every outbound call.
#[derive(Clone, PartialEq, Eq)]
pub struct ForwardedAuthorization {
    pub scheme: String,
    pub credential: String,
}

impl ForwardedAuthorization {
    /// `None` for an absent or blank header.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        if header.is_empty() {
            return None;
        }
        let (scheme, credential) = header.split_once(' ').unwrap_or((header, ""));
        Some(Self {
            scheme: scheme.to_string(),
            credential: credential.to_string(),
        })
    }

    pub fn header_value(&self) -> String {
        if self.credential.is_empty() {
            self.scheme.clone()
        } else {
            format!("{} {}", self.scheme, self.credential)
        }
    }
}

// Credentials stay out of debug output and logs.
impl std::fmt::Debug for ForwardedAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardedAuthorization")
            .field("scheme", &self.scheme)
            .field("credential", &"<redacted>")
            .finish()
    }
}
