use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub is_approved: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Profile {
    /// Full name if set, otherwise the local part of the e-mail address.
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }

    /// Admins are always let in, everyone else needs approval.
    pub fn has_access(&self) -> bool {
        self.is_admin || self.is_approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(full_name: Option<&str>) -> Profile {
        Profile {
            id: 1,
            email: "kovacs.anna@example.com".into(),
            full_name: full_name.map(String::from),
            avatar_url: None,
            is_admin: false,
            is_approved: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        assert_eq!(profile(Some("Kovács Anna")).display_name(), "Kovács Anna");
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        assert_eq!(profile(None).display_name(), "kovacs.anna");
        assert_eq!(profile(Some("  ")).display_name(), "kovacs.anna");
    }

    #[test]
    fn admins_have_access_without_approval() {
        let mut p = profile(None);
        assert!(!p.has_access());
        p.is_admin = true;
        assert!(p.has_access());
    }
}
